//! 1Password Secret Controller Library
//!
//! Core of a controller that mirrors 1Password items into Kubernetes Secrets.
//! Fetching items from 1Password and scheduling reconciliations are left to
//! the caller.
//!
//! ```no_run
//! # async fn run(item: onepassword_secret_controller::model::Item) -> anyhow::Result<()> {
//! use onepassword_secret_controller::prelude::*;
//!
//! let client = kube::Client::try_default().await?;
//! let reconciler = SecretReconciler::from_config(
//!     KubeSecretStore::new(client),
//!     &SyncConfig::from_env(),
//!     tracing::info_span!("onepassword"),
//! );
//!
//! let request = SecretRequest::new("db-credentials", "default", &item);
//! reconciler.reconcile(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod error;
pub mod model;
pub mod observability;

pub mod prelude {
    pub use crate::config::SyncConfig;
    pub use crate::controller::builder::{PayloadSource, PayloadStrategy, SecretData, SecretDataBuilder};
    pub use crate::controller::reconciler::{
        KubeSecretStore, ReconcileOutcome, SecretReconciler, SecretRequest, SecretStore,
    };
    pub use crate::crd::{ImagePullSecretConfig, OnePasswordItem, OnePasswordItemSpec, SecretTemplate};
    pub use crate::error::{Error, Result, StoreError, ValidationError};
    pub use crate::model::{File, Item, ItemField, ItemSection};
}
