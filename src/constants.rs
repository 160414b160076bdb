//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! Annotation keys are part of the wire contract with other controllers that
//! watch the generated Secrets, so their values must not change.

/// Common prefix for every annotation the controller reads or writes
pub const ANNOTATION_PREFIX: &str = "operator.1password.io";

/// Workload annotation naming the Secret to generate for an item
///
/// Read by callers that discover items from workload annotations. The
/// reconciler never writes it.
pub const NAME_ANNOTATION: &str = "operator.1password.io/item-name";

/// Annotation holding the item version the Secret data was built from
pub const VERSION_ANNOTATION: &str = "operator.1password.io/item-version";

/// Annotation holding the `vaults/{vault}/items/{item}` path of the source item
pub const ITEM_PATH_ANNOTATION: &str = "operator.1password.io/item-path";

/// Annotation requesting a restart of workloads that consume the Secret
/// Value must be a boolean-parseable string
pub const RESTART_DEPLOYMENTS_ANNOTATION: &str = "operator.1password.io/auto-restart";

/// Default Kubernetes Secret type
/// An empty type and `Opaque` are treated the same by Kubernetes
pub const SECRET_TYPE_OPAQUE: &str = "Opaque";

/// Secret type used by registry credential Secrets
///
/// Set by the resource alongside `imagePullSecret`. The reconciler passes the
/// requested type through and never infers it from the payload.
pub const SECRET_TYPE_DOCKER_CONFIG_JSON: &str = "kubernetes.io/dockerconfigjson";

/// Data key holding a registry credential document
pub const DOCKER_CONFIG_JSON_KEY: &str = ".dockerconfigjson";

/// Maximum length of a DNS-1123 subdomain (Secret names)
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

/// Maximum length of a Secret data key
pub const DATA_KEY_MAX_LENGTH: usize = 253;

/// Default timeout for the fetch-compare-write sequence against the API server (seconds)
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

/// Default global log level
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";
