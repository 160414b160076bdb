//! # Templates
//!
//! Custom shaping of Secret data from item fields.
//!
//! - `context`: projection of an item into template lookup maps
//! - `engine`: `{{ }}` template parsing and execution
//! - `image_pull`: `.dockerconfigjson` registry credential documents

pub mod context;
pub mod engine;
pub mod image_pull;

pub use context::TemplateContext;
pub use engine::{process_template, Template};
pub use image_pull::{build_docker_config_json, DockerConfigEntry, DockerConfigJson};
