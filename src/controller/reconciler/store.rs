//! # Secret Store
//!
//! Fetch, create and update access to Kubernetes Secrets.

use crate::error::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::PostParams;
use kube::{Api, Client, ResourceExt};
use std::fmt;

/// Namespaced Secret storage
///
/// `get` must return [`StoreError::NotFound`] when the Secret does not exist
/// so that callers can tell a missing Secret apart from a failed fetch.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, name: &str, namespace: &str) -> Result<Secret, StoreError>;

    async fn create(&self, secret: &Secret) -> Result<(), StoreError>;

    async fn update(&self, secret: &Secret) -> Result<(), StoreError>;
}

/// [`SecretStore`] backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl fmt::Debug for KubeSecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeSecretStore").finish_non_exhaustive()
    }
}

impl KubeSecretStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get(&self, name: &str, namespace: &str) -> Result<Secret, StoreError> {
        match self.api(namespace).get(name).await {
            Ok(secret) => Ok(secret),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn create(&self, secret: &Secret) -> Result<(), StoreError> {
        let namespace = secret.namespace().unwrap_or_default();
        self.api(&namespace)
            .create(&PostParams::default(), secret)
            .await?;
        Ok(())
    }

    async fn update(&self, secret: &Secret) -> Result<(), StoreError> {
        let namespace = secret.namespace().unwrap_or_default();
        self.api(&namespace)
            .replace(&secret.name_any(), &PostParams::default(), secret)
            .await?;
        Ok(())
    }
}
