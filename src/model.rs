//! # Item Model
//!
//! Read-only view of a secret-manager item as handed over by the item client.
//!
//! Field order is significant: when several fields share a label, the last
//! one in source order wins wherever fields are flattened by label.

use crate::crd::ItemPath;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// A 1Password item
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub id: String,
    pub vault_id: String,
    /// Incremented by the secret manager on every edit
    pub version: u64,
    pub tags: Vec<String>,
    pub fields: Vec<ItemField>,
    pub sections: Vec<ItemSection>,
    pub files: Vec<File>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Path of the item in `vaults/{vault}/items/{item}` form
    #[must_use]
    pub fn path(&self) -> ItemPath {
        ItemPath::new(self.vault_id.clone(), self.id.clone())
    }
}

/// A single labeled value on an item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemField {
    /// Unique within the item
    pub id: String,
    /// Not unique
    pub label: String,
    pub value: String,
    /// Empty when the field is not in a section
    pub section_id: String,
    pub field_type: String,
}

impl ItemField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn in_section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = section_id.into();
        self
    }
}

/// A named grouping of fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSection {
    pub id: String,
    /// Display label, not guaranteed unique
    pub title: String,
}

impl ItemSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Loads the content of a file attachment on demand
///
/// Loading may fail independently of the file metadata.
#[async_trait]
pub trait FileContentLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<u8>>;
}

/// Loader for content that is already in memory
#[derive(Debug, Clone)]
pub struct InMemoryContent(pub Vec<u8>);

#[async_trait]
impl FileContentLoader for InMemoryContent {
    async fn load(&self) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

/// A file attached to an item
#[derive(Clone, Default)]
pub struct File {
    pub id: String,
    pub name: String,
    pub size: u64,
    loader: Option<Arc<dyn FileContentLoader>>,
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .field("loader", &self.loader.as_ref().map(|_| "..."))
            .finish()
    }
}

impl File {
    pub fn new(id: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            loader: None,
        }
    }

    /// Attach a content loader
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn FileContentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Attach content that is already known
    #[must_use]
    pub fn with_content(self, content: impl Into<Vec<u8>>) -> Self {
        self.with_loader(Arc::new(InMemoryContent(content.into())))
    }

    /// Load the file content
    ///
    /// Returns `Ok(None)` when no loader is attached.
    pub async fn content(&self) -> Result<Option<Vec<u8>>> {
        match &self.loader {
            Some(loader) => loader.load().await.map(Some),
            None => Ok(None),
        }
    }
}
