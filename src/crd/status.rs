//! # OnePasswordItem Status
//!
//! Status types for tracking reconciliation state and conditions.

use serde::{Deserialize, Serialize};

/// Status of the OnePasswordItem resource
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnePasswordItemStatus {
    /// Conditions represent the latest available observations
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type, currently only "Ready"
    pub r#type: String,
    /// "True", "False" or "Unknown"
    pub status: String,
    #[serde(default)]
    pub last_transition_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Condition {
    /// Ready condition stamped with the current time
    #[must_use]
    pub fn ready(ready: bool, message: Option<String>) -> Self {
        Self {
            r#type: "Ready".to_string(),
            status: if ready { "True" } else { "False" }.to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            message,
        }
    }
}

impl OnePasswordItemStatus {
    /// Status reflecting the result of a reconciliation
    #[must_use]
    pub fn from_result<T, E: std::fmt::Display>(result: &Result<T, E>) -> Self {
        let condition = match result {
            Ok(_) => Condition::ready(true, None),
            Err(err) => Condition::ready(false, Some(err.to_string())),
        };
        Self {
            conditions: vec![condition],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_result() {
        let ok: Result<(), String> = Ok(());
        let status = OnePasswordItemStatus::from_result(&ok);
        assert_eq!(status.conditions[0].r#type, "Ready");
        assert_eq!(status.conditions[0].status, "True");
        assert!(status.conditions[0].message.is_none());

        let failed: Result<(), String> = Err("secret type is immutable".to_string());
        let status = OnePasswordItemStatus::from_result(&failed);
        assert_eq!(status.conditions[0].status, "False");
        assert_eq!(
            status.conditions[0].message.as_deref(),
            Some("secret type is immutable")
        );
    }
}
