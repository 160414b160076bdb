//! # Reconciliation
//!
//! Create, update or leave alone a single Secret.

use super::request::SecretRequest;
use super::store::SecretStore;
use crate::config::SyncConfig;
use crate::constants::{SECRET_TYPE_OPAQUE, VERSION_ANNOTATION};
use crate::controller::builder::SecretDataBuilder;
use crate::error::{Error, Result, StoreError, StoreOperation};
use crate::observability::metrics;
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{info, info_span, Instrument, Span};

/// Outcome of a successful reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created,
    Updated,
    Unchanged,
}

impl ReconcileOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Created => "created",
            ReconcileOutcome::Updated => "updated",
            ReconcileOutcome::Unchanged => "unchanged",
        }
    }
}

/// Keeps Kubernetes Secrets in line with 1Password items
///
/// No compare-and-swap is performed against the store. Concurrent
/// reconciliations of the same Secret race and the last write wins, so
/// callers should serialize work per Secret name.
#[derive(Debug)]
pub struct SecretReconciler<S> {
    store: S,
    builder: SecretDataBuilder,
    span: Span,
    timeout: Duration,
}

impl<S: SecretStore> SecretReconciler<S> {
    /// Create a reconciler that logs within `span`
    pub fn new(store: S, span: Span) -> Self {
        Self::from_config(store, &SyncConfig::default(), span)
    }

    pub fn from_config(store: S, config: &SyncConfig, span: Span) -> Self {
        Self {
            store,
            builder: SecretDataBuilder::new(span.clone()),
            span,
            timeout: config.store_timeout(),
        }
    }

    /// Bound the fetch-compare-write sequence
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bring the stored Secret in line with `request`
    ///
    /// At most one write is issued. Dropping the returned future cancels any
    /// in-flight store call.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the auto-restart value is not a boolean,
    ///   raised before the store is touched
    /// - [`Error::ImmutableType`] if the stored Secret has a different type
    /// - [`Error::Store`] if a store call fails
    /// - [`Error::Timeout`] if the store sequence does not finish in time
    pub async fn reconcile(&self, request: &SecretRequest<'_>) -> Result<ReconcileOutcome> {
        let start = Instant::now();
        let span = info_span!(
            parent: &self.span,
            "secret.reconcile",
            secret.name = %request.name,
            secret.namespace = %request.namespace,
            item.path = %request.item.path(),
        );

        let result = self.reconcile_inner(request).instrument(span).await;

        let outcome = result.as_ref().map_or("failed", ReconcileOutcome::as_str);
        metrics::record_reconciliation(outcome, start.elapsed().as_secs_f64());
        result
    }

    async fn reconcile_inner(&self, request: &SecretRequest<'_>) -> Result<ReconcileOutcome> {
        let annotations = request.secret_annotations()?;
        let (data, _) = self.builder.build(request.payload_source()).await;
        let desired = request.build_secret(annotations, data);

        let name = request.secret_name();
        match tokio::time::timeout(self.timeout, self.apply(&name, &request.namespace, desired))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                namespace: request.namespace.clone(),
                name,
                timeout: self.timeout,
            }),
        }
    }

    async fn apply(&self, name: &str, namespace: &str, desired: Secret) -> Result<ReconcileOutcome> {
        let store_error = |operation: StoreOperation, source: StoreError| Error::Store {
            operation,
            namespace: namespace.to_string(),
            name: name.to_string(),
            source,
        };

        let mut current = match self.store.get(name, namespace).await {
            Ok(current) => current,
            Err(StoreError::NotFound) => {
                info!("Creating Secret {} at namespace '{}'", name, namespace);
                self.store
                    .create(&desired)
                    .await
                    .map_err(|e| store_error(StoreOperation::Create, e))?;
                return Ok(ReconcileOutcome::Created);
            }
            Err(e) => return Err(store_error(StoreOperation::Get, e)),
        };

        let current_type = normalized_type(current.type_.as_deref());
        let requested_type = normalized_type(desired.type_.as_deref());
        if current_type != requested_type {
            return Err(Error::ImmutableType {
                current: current_type.to_string(),
                requested: requested_type.to_string(),
            });
        }

        if same_entries(
            current.metadata.annotations.as_ref(),
            desired.metadata.annotations.as_ref(),
        ) && same_entries(
            current.metadata.labels.as_ref(),
            desired.metadata.labels.as_ref(),
        ) {
            let version = desired
                .metadata
                .annotations
                .as_ref()
                .and_then(|a| a.get(VERSION_ANNOTATION))
                .map_or("", String::as_str);
            info!(
                "Secret with name {} and version {} already exists",
                name, version
            );
            return Ok(ReconcileOutcome::Unchanged);
        }

        info!("Updating Secret {} at namespace '{}'", name, namespace);
        // Data is replaced wholesale, keys added by others are dropped
        current.metadata.annotations = desired.metadata.annotations;
        current.metadata.labels = desired.metadata.labels;
        current.data = desired.data;
        self.store
            .update(&current)
            .await
            .map_err(|e| store_error(StoreOperation::Update, e))?;
        Ok(ReconcileOutcome::Updated)
    }
}

/// `""` and `Opaque` are the same type
fn normalized_type(secret_type: Option<&str>) -> &str {
    match secret_type {
        None | Some("") => SECRET_TYPE_OPAQUE,
        Some(other) => other,
    }
}

/// Order-independent equality of two string maps, absent equals empty
fn same_entries(
    left: Option<&BTreeMap<String, String>>,
    right: Option<&BTreeMap<String, String>>,
) -> bool {
    let left_len = left.map_or(0, BTreeMap::len);
    let right_len = right.map_or(0, BTreeMap::len);
    if left_len != right_len {
        return false;
    }
    match (left, right) {
        (Some(left), Some(right)) => left
            .iter()
            .all(|(key, value)| right.get(key) == Some(value)),
        _ => true,
    }
}
