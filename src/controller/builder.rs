//! # Secret Data Builder
//!
//! Synthesizes the `data` map of a Kubernetes Secret from a 1Password item.
//!
//! Strategies are tried in a fixed order and the first one that handles the
//! item wins:
//!
//! 1. **Image pull**: a single `.dockerconfigjson` key built from four fields.
//!    A build failure is logged and the next strategy is tried.
//! 2. **Template**: one key per template entry. Entries that fail to render
//!    are logged and skipped, the strategy still wins.
//! 3. **Field mapping**: one key per field label, plus one per attached file
//!    whose sanitized name is not already taken.
//!
//! Every emitted key passes through [`format_data_key`].

use crate::constants::DOCKER_CONFIG_JSON_KEY;
use crate::controller::naming::format_data_key;
use crate::controller::template::{image_pull, process_template, TemplateContext};
use crate::crd::{ImagePullSecretConfig, SecretTemplate};
use crate::error::Error;
use crate::model::Item;
use crate::observability::metrics;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn, Instrument, Span};

/// Secret data keyed by data key
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Inputs of a single payload synthesis
#[derive(Debug, Clone, Copy)]
pub struct PayloadSource<'a> {
    pub item: &'a Item,
    pub template: Option<&'a SecretTemplate>,
    pub image_pull_secret: Option<&'a ImagePullSecretConfig>,
}

impl<'a> PayloadSource<'a> {
    #[must_use]
    pub fn new(item: &'a Item) -> Self {
        Self {
            item,
            template: None,
            image_pull_secret: None,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: Option<&'a SecretTemplate>) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn with_image_pull_secret(mut self, config: Option<&'a ImagePullSecretConfig>) -> Self {
        self.image_pull_secret = config;
        self
    }
}

/// Payload construction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStrategy {
    ImagePull,
    Template,
    FieldMapping,
}

impl PayloadStrategy {
    /// Strategies in priority order
    pub const CASCADE: [PayloadStrategy; 3] = [
        PayloadStrategy::ImagePull,
        PayloadStrategy::Template,
        PayloadStrategy::FieldMapping,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadStrategy::ImagePull => "image_pull",
            PayloadStrategy::Template => "template",
            PayloadStrategy::FieldMapping => "field_mapping",
        }
    }
}

/// Result of applying one strategy
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The strategy produced the payload, later strategies are not consulted
    Handled(SecretData),
    /// The strategy does not apply, or failed with a recoverable error
    Declined(Option<Error>),
}

/// Builds Secret data from items
#[derive(Debug, Clone)]
pub struct SecretDataBuilder {
    span: Span,
}

impl Default for SecretDataBuilder {
    fn default() -> Self {
        Self::new(Span::none())
    }
}

impl SecretDataBuilder {
    /// Create a builder that logs within `span`
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Synthesize Secret data, returning the payload and the strategy that produced it
    pub async fn build(&self, source: PayloadSource<'_>) -> (SecretData, PayloadStrategy) {
        async move {
            for strategy in PayloadStrategy::CASCADE {
                match self.apply(strategy, &source).await {
                    StrategyOutcome::Handled(data) => {
                        debug!(
                            "Built {} Secret data keys with {} strategy",
                            data.len(),
                            strategy.as_str()
                        );
                        metrics::increment_payload_strategy(strategy.as_str());
                        return (data, strategy);
                    }
                    StrategyOutcome::Declined(Some(e)) => {
                        warn!(
                            "Failed to build Secret data with {} strategy, falling back: {}",
                            strategy.as_str(),
                            e
                        );
                    }
                    StrategyOutcome::Declined(None) => {}
                }
            }

            // Field mapping always handles the item
            (SecretData::new(), PayloadStrategy::FieldMapping)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Apply a single strategy
    pub async fn apply(
        &self,
        strategy: PayloadStrategy,
        source: &PayloadSource<'_>,
    ) -> StrategyOutcome {
        async move {
            match strategy {
                PayloadStrategy::ImagePull => match source.image_pull_secret {
                    Some(config) => Self::image_pull(source.item, config),
                    None => StrategyOutcome::Declined(None),
                },
                PayloadStrategy::Template => match source.template {
                    Some(template) if !template.is_empty() => {
                        Self::template(source.item, template)
                    }
                    _ => StrategyOutcome::Declined(None),
                },
                PayloadStrategy::FieldMapping => {
                    StrategyOutcome::Handled(Self::field_mapping(source.item).await)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    fn image_pull(item: &Item, config: &ImagePullSecretConfig) -> StrategyOutcome {
        let fields: HashMap<String, String> = item
            .fields
            .iter()
            .map(|field| (field.label.clone(), field.value.clone()))
            .collect();

        match image_pull::build_from_fields(&fields, config) {
            Ok(json) => StrategyOutcome::Handled(SecretData::from([(
                DOCKER_CONFIG_JSON_KEY.to_string(),
                json,
            )])),
            Err(e) => StrategyOutcome::Declined(Some(e)),
        }
    }

    fn template(item: &Item, template: &SecretTemplate) -> StrategyOutcome {
        let ctx = TemplateContext::from_item(item);
        let mut data = SecretData::new();

        for (key, source) in &template.data {
            let rendered = match process_template(source, &ctx) {
                Ok(rendered) => rendered,
                Err(e) => {
                    warn!("Failed to process template for key '{}', skipping: {}", key, e);
                    metrics::increment_payload_keys_skipped("template_error");
                    continue;
                }
            };
            if let Some(key) = sanitized_key(key) {
                data.insert(key, rendered);
            }
        }

        StrategyOutcome::Handled(data)
    }

    async fn field_mapping(item: &Item) -> SecretData {
        let mut data = SecretData::new();

        // Source order matters: the last field with a given label wins
        for field in &item.fields {
            if let Some(key) = sanitized_key(&field.label) {
                data.insert(key, field.value.clone().into_bytes());
            }
        }

        for file in &item.files {
            let Some(key) = sanitized_key(&file.name) else {
                continue;
            };
            if data.contains_key(&key) {
                info!(
                    "File '{}' ignored because data key '{}' is already set",
                    file.name, key
                );
                metrics::increment_payload_keys_skipped("file_collision");
                continue;
            }

            match file.content().await {
                Ok(Some(content)) => {
                    data.insert(key, content);
                }
                Ok(None) => {
                    debug!("File '{}' has no content loader, skipping", file.name);
                    metrics::increment_payload_keys_skipped("file_unavailable");
                }
                Err(e) => {
                    warn!("Could not load contents of file '{}': {}", file.name, e);
                    metrics::increment_payload_keys_skipped("file_unavailable");
                }
            }
        }

        data
    }
}

fn sanitized_key(raw: &str) -> Option<String> {
    let key = format_data_key(raw);
    if key.is_empty() {
        warn!("Data key '{}' has no valid characters, skipping", raw);
        metrics::increment_payload_keys_skipped("empty_key");
        return None;
    }
    Some(key)
}
