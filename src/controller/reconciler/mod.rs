//! # Reconciler
//!
//! Synchronizes a 1Password item into a Kubernetes Secret.
//!
//! ## Reconciliation Flow
//!
//! 1. Validate the auto-restart value and compute annotations
//! 2. Build Secret data (image pull, template or field mapping)
//! 3. Fetch the stored Secret
//! 4. Choose:
//!    - **Absent**: create it
//!    - **Type changed**: fail, the type is immutable
//!    - **Annotations or labels changed**: overwrite annotations, labels and data
//!    - **Otherwise**: nothing to do

pub mod reconcile;
pub mod request;
pub mod store;

// Re-export public API
pub use reconcile::{ReconcileOutcome, SecretReconciler};
pub use request::{parse_bool, SecretRequest};
pub use store::{KubeSecretStore, SecretStore};
