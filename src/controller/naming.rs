//! # Naming
//!
//! Rewrites arbitrary item labels into valid Kubernetes identifiers.
//!
//! - Secret names must be DNS-1123 subdomains: lowercase alphanumerics, `-`
//!   and `.`, starting and ending with an alphanumeric character.
//! - Secret data keys may contain alphanumerics, `-`, `_` and `.`.
//!
//! Both limits are 253 characters. The two rewrites are intentionally
//! different: names are lowercased and only trimmed of `-`/`.` at the ends,
//! keys keep their case and have any invalid leading/trailing run deleted
//! before interior runs are replaced.

use crate::constants::{DATA_KEY_MAX_LENGTH, DNS1123_SUBDOMAIN_MAX_LENGTH};
use regex::Regex;
use std::sync::LazyLock;

static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("DNS-1123 subdomain pattern is a valid regex")
});

static DATA_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-._a-zA-Z0-9]+$").expect("data key pattern is a valid regex")
});

static INVALID_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9\-.]+").expect("invalid name chars pattern is a valid regex")
});

static INVALID_KEY_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\-._]+").expect("invalid key chars pattern is a valid regex")
});

static INVALID_KEY_EDGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^[^a-zA-Z0-9\-._]+|[^a-zA-Z0-9\-._]+$)")
        .expect("invalid key edges pattern is a valid regex")
});

/// Check whether a value is a valid Secret name
#[must_use]
pub fn is_valid_secret_name(value: &str) -> bool {
    value.len() <= DNS1123_SUBDOMAIN_MAX_LENGTH && DNS1123_SUBDOMAIN.is_match(value)
}

/// Check whether a value is a valid Secret data key
#[must_use]
pub fn is_valid_data_key(value: &str) -> bool {
    value.len() <= DATA_KEY_MAX_LENGTH && DATA_KEY.is_match(value)
}

/// Rewrite a value to be a valid Secret name
///
/// Valid names are returned unchanged.
#[must_use]
pub fn format_secret_name(value: &str) -> String {
    if is_valid_secret_name(value) {
        return value.to_string();
    }

    let lowered = value.to_lowercase();
    let mut result = INVALID_NAME_CHARS.replace_all(&lowered, "-").into_owned();
    // Only ASCII survives the replacement so byte truncation is safe
    result.truncate(DNS1123_SUBDOMAIN_MAX_LENGTH);

    // First and last character must be alphanumeric
    result.trim_matches(|c| c == '-' || c == '.').to_string()
}

/// Rewrite a value to be a valid Secret data key
///
/// Valid keys are returned unchanged. Case is always preserved.
#[must_use]
pub fn format_data_key(value: &str) -> String {
    if is_valid_data_key(value) {
        return value.to_string();
    }

    let stripped = INVALID_KEY_EDGES.replace_all(value, "");
    let mut result = INVALID_KEY_CHARS.replace_all(&stripped, "-").into_owned();
    result.truncate(DATA_KEY_MAX_LENGTH);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    mod secret_name_tests {
        use super::*;

        #[test]
        fn test_format_secret_name_keeps_valid_name() {
            assert_eq!(format_secret_name("my-secret.v1"), "my-secret.v1");
        }

        #[test]
        fn test_format_secret_name_lowercases_and_replaces_runs() {
            assert_eq!(format_secret_name("My Secret!!Name"), "my-secret-name");
            assert_eq!(format_secret_name("db_password"), "db-password");
        }

        #[test]
        fn test_format_secret_name_trims_edges() {
            assert_eq!(format_secret_name("--.Secret.--"), "secret");
            assert_eq!(format_secret_name("  spaced  "), "spaced");
        }

        #[test]
        fn test_format_secret_name_truncates() {
            let long = "A".repeat(300);
            let result = format_secret_name(&long);
            assert_eq!(result.len(), DNS1123_SUBDOMAIN_MAX_LENGTH);
            assert!(is_valid_secret_name(&result));
        }

        #[test]
        fn test_format_secret_name_trims_after_truncation() {
            let value = format!("{}_tail", "a".repeat(252));
            let result = format_secret_name(&value);
            assert_eq!(result, "a".repeat(252));
        }

        #[test]
        fn test_format_secret_name_is_idempotent() {
            let inputs = [
                "",
                "Hello World",
                "--weird__NAME..",
                "a.-b",
                "ünïcödé name",
                "UPPER.case-Name_1",
                "!!!",
            ];
            for input in inputs {
                let once = format_secret_name(input);
                assert_eq!(
                    format_secret_name(&once),
                    once,
                    "format_secret_name should be idempotent for '{input}'"
                );
            }
        }
    }

    mod data_key_tests {
        use super::*;

        #[test]
        fn test_format_data_key_keeps_valid_key_byte_identical() {
            for key in ["API_KEY", "tls.crt", "my-Key_2", ".dockerconfigjson"] {
                assert_eq!(format_data_key(key), key);
            }
        }

        #[test]
        fn test_format_data_key_preserves_case() {
            assert_eq!(format_data_key("Database URL"), "Database-URL");
        }

        #[test]
        fn test_format_data_key_strips_invalid_edges() {
            assert_eq!(format_data_key("  API Key!!"), "API-Key");
            assert_eq!(format_data_key("@@token"), "token");
        }

        #[test]
        fn test_format_data_key_replaces_interior_runs_once() {
            assert_eq!(format_data_key("one / two"), "one-two");
        }

        #[test]
        fn test_format_data_key_only_invalid_characters_is_empty() {
            assert_eq!(format_data_key("!!!"), "");
        }

        #[test]
        fn test_format_data_key_truncates() {
            let value = format!("{} x", "k".repeat(300));
            let result = format_data_key(&value);
            assert_eq!(result.len(), DATA_KEY_MAX_LENGTH);
            assert!(is_valid_data_key(&result));
        }

        #[test]
        fn test_name_and_key_rewrites_differ() {
            // Names lowercase and keep underscores out, keys do neither
            assert_eq!(format_secret_name("My_Key"), "my-key");
            assert_eq!(format_data_key("My_Key"), "My_Key");
            // Names trim only '-' and '.', keys delete any invalid edge run
            assert_eq!(format_secret_name("-key-"), "key");
            assert_eq!(format_data_key("-key-"), "-key-");
        }
    }
}
