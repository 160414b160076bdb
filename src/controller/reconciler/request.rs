//! # Secret Request
//!
//! Everything the reconciler needs to know about one desired Secret.

use crate::constants::{ITEM_PATH_ANNOTATION, RESTART_DEPLOYMENTS_ANNOTATION, VERSION_ANNOTATION};
use crate::controller::builder::{PayloadSource, SecretData};
use crate::controller::naming::format_secret_name;
use crate::crd::{ImagePullSecretConfig, SecretTemplate};
use crate::error::ValidationError;
use crate::model::Item;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Desired state of a Secret built from a 1Password item
#[derive(Debug, Clone)]
pub struct SecretRequest<'a> {
    /// Requested name, sanitized before use
    pub name: String,
    pub namespace: String,
    pub item: &'a Item,
    pub labels: BTreeMap<String, String>,
    /// Caller annotations, the item annotations are added on top
    pub annotations: BTreeMap<String, String>,
    /// Raw auto-restart value, must parse as a boolean when set
    pub auto_restart: Option<String>,
    /// Empty means `Opaque`
    pub secret_type: String,
    pub owner_reference: Option<OwnerReference>,
    pub template: Option<&'a SecretTemplate>,
    pub image_pull_secret: Option<&'a ImagePullSecretConfig>,
}

impl<'a> SecretRequest<'a> {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, item: &'a Item) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            item,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            auto_restart: None,
            secret_type: String::new(),
            owner_reference: None,
            template: None,
            image_pull_secret: None,
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = annotations;
        self
    }

    #[must_use]
    pub fn with_auto_restart(mut self, value: impl Into<String>) -> Self {
        self.auto_restart = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_secret_type(mut self, secret_type: impl Into<String>) -> Self {
        self.secret_type = secret_type.into();
        self
    }

    #[must_use]
    pub fn with_owner_reference(mut self, owner: OwnerReference) -> Self {
        self.owner_reference = Some(owner);
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: &'a SecretTemplate) -> Self {
        self.template = Some(template);
        self
    }

    #[must_use]
    pub fn with_image_pull_secret(mut self, config: &'a ImagePullSecretConfig) -> Self {
        self.image_pull_secret = Some(config);
        self
    }

    /// Name the Secret is stored under
    #[must_use]
    pub fn secret_name(&self) -> String {
        format_secret_name(&self.name)
    }

    /// Caller annotations plus item version, item path and auto-restart
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBoolean`] if the auto-restart value
    /// is not a boolean string.
    pub fn secret_annotations(&self) -> Result<BTreeMap<String, String>, ValidationError> {
        let mut annotations = self.annotations.clone();
        annotations.insert(
            VERSION_ANNOTATION.to_string(),
            self.item.version.to_string(),
        );
        annotations.insert(
            ITEM_PATH_ANNOTATION.to_string(),
            self.item.path().to_string(),
        );

        if let Some(value) = self.auto_restart.as_deref().filter(|v| !v.is_empty()) {
            if parse_bool(value).is_none() {
                return Err(ValidationError::InvalidBoolean {
                    annotation: RESTART_DEPLOYMENTS_ANNOTATION,
                    secret: self.name.clone(),
                    value: value.to_string(),
                });
            }
            annotations.insert(
                RESTART_DEPLOYMENTS_ANNOTATION.to_string(),
                value.to_string(),
            );
        }

        Ok(annotations)
    }

    pub(crate) fn payload_source(&self) -> PayloadSource<'a> {
        PayloadSource::new(self.item)
            .with_template(self.template)
            .with_image_pull_secret(self.image_pull_secret)
    }

    /// Assemble the Secret object
    #[must_use]
    pub fn build_secret(&self, annotations: BTreeMap<String, String>, data: SecretData) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(self.secret_name()),
                namespace: Some(self.namespace.clone()),
                annotations: Some(annotations),
                labels: Some(self.labels.clone()),
                owner_references: self.owner_reference.clone().map(|owner| vec![owner]),
                ..Default::default()
            },
            data: Some(
                data.into_iter()
                    .map(|(key, value)| (key, ByteString(value)))
                    .collect(),
            ),
            type_: (!self.secret_type.is_empty()).then(|| self.secret_type.clone()),
            ..Default::default()
        }
    }
}

/// Parse a boolean string the way Kubernetes annotations are usually written
///
/// Accepts `1`, `t`, `true`, `0`, `f` and `false` in any case.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DOCKER_CONFIG_JSON_KEY, SECRET_TYPE_DOCKER_CONFIG_JSON};
    use crate::model::ItemField;

    fn item() -> Item {
        Item {
            id: "item-1".to_string(),
            vault_id: "vault-1".to_string(),
            version: 7,
            fields: vec![ItemField::new("f1", "password", "s3cr3t")],
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_bool() {
        for value in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        for value in ["maybe", "yes", "", "2"] {
            assert_eq!(parse_bool(value), None, "{value}");
        }
    }

    #[test]
    fn test_secret_annotations() {
        let item = item();
        let request = SecretRequest::new("creds", "default", &item)
            .with_annotations(BTreeMap::from([("team".to_string(), "core".to_string())]))
            .with_auto_restart("true");

        let annotations = request.secret_annotations().unwrap();

        assert_eq!(annotations[VERSION_ANNOTATION], "7");
        assert_eq!(annotations[ITEM_PATH_ANNOTATION], "vaults/vault-1/items/item-1");
        assert_eq!(annotations[RESTART_DEPLOYMENTS_ANNOTATION], "true");
        assert_eq!(annotations["team"], "core");
    }

    #[test]
    fn test_item_annotations_override_caller_annotations() {
        let item = item();
        let request = SecretRequest::new("creds", "default", &item).with_annotations(
            BTreeMap::from([(VERSION_ANNOTATION.to_string(), "1".to_string())]),
        );

        let annotations = request.secret_annotations().unwrap();
        assert_eq!(annotations[VERSION_ANNOTATION], "7");
        assert!(!annotations.contains_key(RESTART_DEPLOYMENTS_ANNOTATION));
    }

    #[test]
    fn test_invalid_auto_restart_is_rejected() {
        let item = item();
        let request = SecretRequest::new("creds", "default", &item).with_auto_restart("maybe");

        let err = request.secret_annotations().unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidBoolean {
                annotation: RESTART_DEPLOYMENTS_ANNOTATION,
                secret: "creds".to_string(),
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_auto_restart_is_ignored() {
        let item = item();
        let request = SecretRequest::new("creds", "default", &item).with_auto_restart("");

        let annotations = request.secret_annotations().unwrap();
        assert!(!annotations.contains_key(RESTART_DEPLOYMENTS_ANNOTATION));
    }

    #[test]
    fn test_build_secret() {
        let item = item();
        let owner = OwnerReference {
            api_version: "onepassword.com/v1".to_string(),
            kind: "OnePasswordItem".to_string(),
            name: "creds".to_string(),
            uid: "uid-1".to_string(),
            controller: Some(true),
            ..Default::default()
        };
        let request = SecretRequest::new("My_Creds", "apps", &item)
            .with_labels(BTreeMap::from([("app".to_string(), "web".to_string())]))
            .with_secret_type("kubernetes.io/basic-auth")
            .with_owner_reference(owner.clone());

        let data = SecretData::from([("password".to_string(), b"s3cr3t".to_vec())]);
        let secret = request.build_secret(BTreeMap::new(), data);

        assert_eq!(secret.metadata.name.as_deref(), Some("my-creds"));
        assert_eq!(secret.metadata.namespace.as_deref(), Some("apps"));
        assert_eq!(secret.metadata.labels.unwrap()["app"], "web");
        assert_eq!(secret.metadata.owner_references, Some(vec![owner]));
        assert_eq!(secret.type_.as_deref(), Some("kubernetes.io/basic-auth"));
        assert_eq!(secret.data.unwrap()["password"].0, b"s3cr3t");
    }

    #[test]
    fn test_build_secret_without_type() {
        let item = item();
        let secret = SecretRequest::new("creds", "apps", &item)
            .build_secret(BTreeMap::new(), SecretData::new());

        assert!(secret.type_.is_none());
        assert!(secret.metadata.owner_references.is_none());
    }

    #[test]
    fn test_registry_type_is_passed_through_not_inferred() {
        let item = item();
        let config = ImagePullSecretConfig::default();
        let data = SecretData::from([(DOCKER_CONFIG_JSON_KEY.to_string(), b"{}".to_vec())]);

        let inferred = SecretRequest::new("registry", "ci", &item)
            .with_image_pull_secret(&config)
            .build_secret(BTreeMap::new(), data.clone());
        assert!(inferred.type_.is_none());

        let requested = SecretRequest::new("registry", "ci", &item)
            .with_image_pull_secret(&config)
            .with_secret_type(SECRET_TYPE_DOCKER_CONFIG_JSON)
            .build_secret(BTreeMap::new(), data);
        assert_eq!(requested.type_.as_deref(), Some(SECRET_TYPE_DOCKER_CONFIG_JSON));
    }
}
