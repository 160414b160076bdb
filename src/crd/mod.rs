//! # Custom Resource Definitions
//!
//! CRD types for the 1Password Secret controller.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `OnePasswordItem` CRD and the template/image pull configuration it carries
//! - `status.rs` - Status types for tracking reconciliation state
//! - `item_path.rs` - Parsing of `vaults/{vault}/items/{item}` references

mod item_path;
mod spec;
mod status;

// Re-export all public types
pub use item_path::ItemPath;
pub use spec::{ImagePullSecretConfig, OnePasswordItem, OnePasswordItemSpec, SecretTemplate};
pub use status::{Condition, OnePasswordItemStatus};
