//! # Image Pull Secrets
//!
//! Builds `.dockerconfigjson` registry credential documents from item fields.

use crate::crd::ImagePullSecretConfig;
use crate::error::{Result, ValidationError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use zeroize::Zeroizing;

/// Structure of a `.dockerconfigjson` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfigJson {
    pub auths: BTreeMap<String, DockerConfigEntry>,
}

/// A single registry entry in a `.dockerconfigjson` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfigEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Base64 of `username:password`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth: String,
}

/// Generate a `.dockerconfigjson` document for a single registry
///
/// Registry, username and password are required. The `email` key is omitted
/// entirely when `email` is empty.
pub fn build_docker_config_json(
    registry: &str,
    username: &str,
    password: &str,
    email: &str,
) -> Result<Vec<u8>> {
    if registry.is_empty() {
        return Err(ValidationError::MissingRegistry.into());
    }
    if username.is_empty() {
        return Err(ValidationError::MissingUsername.into());
    }
    if password.is_empty() {
        return Err(ValidationError::MissingPassword.into());
    }

    let credentials = Zeroizing::new(format!("{username}:{password}"));
    let entry = DockerConfigEntry {
        username: username.to_string(),
        password: password.to_string(),
        email: email.to_string(),
        auth: STANDARD.encode(credentials.as_bytes()),
    };

    let config = DockerConfigJson {
        auths: BTreeMap::from([(registry.to_string(), entry)]),
    };

    Ok(serde_json::to_vec(&config)?)
}

/// Resolve the configured field labels against a flattened `label -> value`
/// map and build the document
///
/// Labels that are not present resolve to an empty value.
pub fn build_from_fields(
    fields: &HashMap<String, String>,
    config: &ImagePullSecretConfig,
) -> Result<Vec<u8>> {
    let lookup = |label: &str| fields.get(label).map_or("", String::as_str);

    let email = config
        .email_field
        .as_deref()
        .filter(|label| !label.is_empty())
        .map_or("", lookup);

    build_docker_config_json(
        lookup(&config.registry_field),
        lookup(&config.username_field),
        lookup(&config.password_field),
        email,
    )
}
