//! # OnePasswordItem Spec
//!
//! Main CRD specification and the payload shaping configuration it carries.

use crate::constants::RESTART_DEPLOYMENTS_ANNOTATION;
use crate::controller::reconciler::SecretRequest;
use crate::crd::ItemPath;
use crate::error::ValidationError;
use crate::model::Item;
use kube::{Resource, ResourceExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OnePasswordItem Custom Resource Definition
///
/// Requests that a 1Password item is mirrored into a Kubernetes Secret with
/// the same name and namespace as the resource.
///
/// # Example
///
/// ```yaml
/// apiVersion: onepassword.com/v1
/// kind: OnePasswordItem
/// metadata:
///   name: registry-credentials
///   namespace: default
///   annotations:
///     operator.1password.io/auto-restart: "true"
/// spec:
///   itemPath: vaults/abc123/items/def456
///   type: kubernetes.io/dockerconfigjson
///   imagePullSecret:
///     registryField: server
///     usernameField: username
///     passwordField: password
/// ```
#[derive(kube::CustomResource, Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "OnePasswordItem",
    group = "onepassword.com",
    version = "v1",
    namespaced,
    status = "crate::crd::OnePasswordItemStatus",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct OnePasswordItemSpec {
    /// Item reference in `vaults/{vault}/items/{item}` form
    pub item_path: String,
    /// Kubernetes Secret type, immutable once the Secret exists
    /// Empty means `Opaque`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    /// Custom data keys rendered from templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<SecretTemplate>,
    /// Build a `.dockerconfigjson` Secret from four item fields
    /// Takes precedence over `template`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_secret: Option<ImagePullSecretConfig>,
}

/// Mapping of Secret data keys to template strings
///
/// Templates can reference `.Fields`, `.Sections` and `.FieldsByID`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretTemplate {
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl SecretTemplate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Field labels used to build a registry credential document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagePullSecretConfig {
    /// Label of the field holding the registry host
    pub registry_field: String,
    /// Label of the field holding the registry username
    pub username_field: String,
    /// Label of the field holding the registry password or token
    pub password_field: String,
    /// Label of the field holding the account email (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_field: Option<String>,
}

impl OnePasswordItemSpec {
    /// Parse `item_path` into vault and item identifiers
    pub fn item_reference(&self) -> Result<ItemPath, ValidationError> {
        ItemPath::parse(&self.item_path)
    }
}

impl OnePasswordItem {
    /// Describe the Secret this resource asks for, built from `item`
    ///
    /// The Secret takes the resource's name, namespace, labels and annotations, the
    /// resource becomes its controller owner, and the auto-restart annotation
    /// on the resource is forwarded to the Secret.
    #[must_use]
    pub fn secret_request<'a>(&'a self, item: &'a Item) -> SecretRequest<'a> {
        let mut request = SecretRequest::new(
            self.name_any(),
            self.namespace().unwrap_or_default(),
            item,
        )
        .with_labels(self.labels().clone())
        .with_annotations(self.annotations().clone())
        .with_secret_type(self.spec.secret_type.clone().unwrap_or_default());

        if let Some(auto_restart) = self.annotations().get(RESTART_DEPLOYMENTS_ANNOTATION) {
            request = request.with_auto_restart(auto_restart.clone());
        }
        if let Some(owner) = self.controller_owner_ref(&()) {
            request = request.with_owner_reference(owner);
        }
        if let Some(template) = &self.spec.template {
            request = request.with_template(template);
        }
        if let Some(image_pull_secret) = &self.spec.image_pull_secret {
            request = request.with_image_pull_secret(image_pull_secret);
        }
        request
    }
}
