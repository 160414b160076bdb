//! # Item Paths
//!
//! `vaults/{vault}/items/{item}` references used by `OnePasswordItem.spec.itemPath`
//! and the item-path annotation.

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Vault and item identifiers parsed from an item path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemPath {
    pub vault: String,
    pub item: String,
}

impl ItemPath {
    pub fn new(vault: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            vault: vault.into(),
            item: item.into(),
        }
    }

    /// Parse `vaults/{vault}/items/{item}`
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidItemPath(path.to_string());

        let mut parts = path.split('/');
        match (parts.next(), parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("vaults"), Some(vault), Some("items"), Some(item), None)
                if !vault.is_empty() && !item.is_empty() =>
            {
                Ok(Self::new(vault, item))
            }
            _ => Err(invalid()),
        }
    }
}

impl FromStr for ItemPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vaults/{}/items/{}", self.vault, self.item)
    }
}
