//! # Template Context
//!
//! Projects an item's fields and sections into the lookup maps that secret
//! templates can reference.

use crate::model::Item;
use std::collections::HashMap;

/// Data exposed to secret templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    /// Flat `label -> value` map, last field wins on duplicate labels
    pub fields: HashMap<String, String>,
    /// Nested `section title -> label -> value` map
    pub sections: HashMap<String, HashMap<String, String>>,
    /// Precise `field id -> value` map for when labels collide
    pub fields_by_id: HashMap<String, String>,
}

impl TemplateContext {
    /// Build the context in a single pass over the item's fields
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        let mut ctx = Self::default();

        let mut section_titles: HashMap<&str, &str> = HashMap::new();
        for section in &item.sections {
            section_titles.insert(section.id.as_str(), section.title.as_str());
            ctx.sections.entry(section.title.clone()).or_default();
        }

        for field in &item.fields {
            ctx.fields.insert(field.label.clone(), field.value.clone());
            ctx.fields_by_id.insert(field.id.clone(), field.value.clone());

            // Unsectioned fields land in the "" bucket, unknown section ids in
            // a bucket named after the raw id
            let bucket = if field.section_id.is_empty() {
                ""
            } else {
                section_titles
                    .get(field.section_id.as_str())
                    .copied()
                    .filter(|title| !title.is_empty())
                    .unwrap_or(field.section_id.as_str())
            };

            ctx.sections
                .entry(bucket.to_string())
                .or_default()
                .insert(field.label.clone(), field.value.clone());
        }

        ctx
    }
}
