//! # Controller
//!
//! Core modules for syncing 1Password items into Kubernetes Secrets.
//!
//! - `builder`: Secret data synthesis (image pull, template, field mapping)
//! - `naming`: Secret name and data key sanitization
//! - `reconciler`: Create/update/no-op decision against the Secret store
//! - `template`: Template context, evaluator and docker config builder

pub mod builder;
pub mod naming;
pub mod reconciler;
pub mod template;
