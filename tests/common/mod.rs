//! Common test utilities for reconciler integration tests
//!
//! Provides an in-memory `SecretStore` that records every call, plus item
//! fixtures shared across test files.

#![allow(dead_code, reason = "Not every test file uses every helper")]

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use onepassword_secret_controller::error::StoreError;
use onepassword_secret_controller::model::{Item, ItemField, ItemSection};
use onepassword_secret_controller::prelude::SecretStore;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// A call issued against the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Get { name: String, namespace: String },
    Create(Secret),
    Update(Secret),
}

/// In-memory `SecretStore` keyed by `(namespace, name)`
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: Mutex<BTreeMap<(String, String), Secret>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_get: bool,
    fail_create: bool,
    fail_update: bool,
    get_delay: Option<Duration>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing Secret
    pub fn with_secret(self, secret: Secret) -> Self {
        self.put(&secret);
        self
    }

    /// Make every `get` fail with an opaque error
    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    /// Make every `create` fail without storing anything
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Make every `update` fail without storing anything
    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    /// Delay every `get` by `delay`
    pub fn with_get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Create and update calls only
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, StoreCall::Get { .. }))
            .collect()
    }

    pub fn stored(&self, namespace: &str, name: &str) -> Option<Secret> {
        self.secrets
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    fn put(&self, secret: &Secret) {
        let key = (
            secret.metadata.namespace.clone().unwrap_or_default(),
            secret.metadata.name.clone().unwrap_or_default(),
        );
        self.secrets.lock().unwrap().insert(key, secret.clone());
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get(&self, name: &str, namespace: &str) -> Result<Secret, StoreError> {
        self.record(StoreCall::Get {
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
        if let Some(delay) = self.get_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_get {
            return Err(anyhow::anyhow!("connection refused").into());
        }
        self.stored(namespace, name).ok_or(StoreError::NotFound)
    }

    async fn create(&self, secret: &Secret) -> Result<(), StoreError> {
        self.record(StoreCall::Create(secret.clone()));
        if self.fail_create {
            return Err(anyhow::anyhow!("admission webhook denied the request").into());
        }
        self.put(secret);
        Ok(())
    }

    async fn update(&self, secret: &Secret) -> Result<(), StoreError> {
        self.record(StoreCall::Update(secret.clone()));
        if self.fail_update {
            return Err(anyhow::anyhow!("conflict").into());
        }
        self.put(secret);
        Ok(())
    }
}

/// Item with sectioned and unsectioned fields
pub fn database_item() -> Item {
    Item {
        id: "item-1".to_string(),
        vault_id: "vault-1".to_string(),
        version: 3,
        fields: vec![
            ItemField::new("f-user", "username", "admin"),
            ItemField::new("f-pass", "password", "hunter2"),
            ItemField::new("f-host", "host", "db.internal").in_section("s-conn"),
        ],
        sections: vec![ItemSection::new("s-conn", "Connection")],
        ..Default::default()
    }
}

/// Secret as a previous pass would have stored it, with one stale data key
pub fn stored_secret(
    name: &str,
    namespace: &str,
    secret_type: Option<&str>,
    annotations: BTreeMap<String, String>,
    labels: BTreeMap<String, String>,
) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            annotations: Some(annotations),
            labels: Some(labels),
            resource_version: Some("42".to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            "stale".to_string(),
            ByteString(b"left over".to_vec()),
        )])),
        type_: secret_type.map(str::to_string),
        ..Default::default()
    }
}

pub fn string_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Decode the data of a Secret into strings
pub fn data_of(secret: &Secret) -> BTreeMap<String, String> {
    secret
        .data
        .as_ref()
        .map(|data| {
            data.iter()
                .map(|(k, v)| (k.clone(), String::from_utf8_lossy(&v.0).into_owned()))
                .collect()
        })
        .unwrap_or_default()
}
