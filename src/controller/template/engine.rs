//! # Template Engine
//!
//! Secret templates use Go `text/template` syntax, rendered with `gtmpl`:
//! - Field paths into the context: `{{ .Fields.username }}`,
//!   `{{ .Sections.Credentials.password }}`
//! - `index` for keys that are not valid bare identifiers:
//!   `{{ index .Fields "api-key" }}`, `{{ index .Sections "My Section" "token" }}`
//! - Comments `{{/* ... */}}` and whitespace trimming with `{{- ` and ` -}}`
//!
//! Malformed actions and unknown functions fail at parse time with
//! [`Error::Parse`]. Referencing a top-level name the context does not expose
//! fails at execution time with [`Error::Execution`]. A key missing from an
//! existing map renders as an empty string.

use crate::controller::template::context::TemplateContext;
use crate::error::{Error, Result};
use gtmpl::Context;
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;

/// What gtmpl prints for a lookup that found nothing
const NO_VALUE: &str = "<no value>";

/// A parsed template
pub struct Template {
    source: String,
    inner: gtmpl::Template,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Parse and execute a template against a context in one step
pub fn process_template(template: &str, ctx: &TemplateContext) -> Result<Vec<u8>> {
    Template::parse(template)?.execute(ctx)
}

impl Template {
    /// Parse a template string
    pub fn parse(source: &str) -> Result<Self> {
        let mut inner = gtmpl::Template::default();
        inner
            .parse(source)
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            inner,
        })
    }

    /// Render the template
    pub fn execute(&self, ctx: &TemplateContext) -> Result<Vec<u8>> {
        let rendered = self
            .inner
            .render(&Context::from(context_value(ctx)))
            .map_err(|e| Error::Execution(e.to_string()))?;

        // Missing map keys render empty, unless the marker is real content
        if self.source.contains(NO_VALUE) || holds_marker(ctx) {
            return Ok(rendered.into_bytes());
        }
        Ok(rendered.replace(NO_VALUE, "").into_bytes())
    }
}

/// Root is an object so unknown top-level names fail, the maps below it are
/// maps so unknown keys do not.
fn context_value(ctx: &TemplateContext) -> Value {
    let sections = ctx
        .sections
        .iter()
        .map(|(name, fields)| (name.clone(), string_map(fields)))
        .collect();

    Value::Object(HashMap::from([
        ("Fields".to_string(), string_map(&ctx.fields)),
        ("Sections".to_string(), Value::Map(sections)),
        ("FieldsByID".to_string(), string_map(&ctx.fields_by_id)),
    ]))
}

fn string_map(map: &HashMap<String, String>) -> Value {
    Value::Map(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn holds_marker(ctx: &TemplateContext) -> bool {
    ctx.fields
        .values()
        .chain(ctx.fields_by_id.values())
        .chain(ctx.sections.values().flat_map(HashMap::values))
        .any(|value| value.contains(NO_VALUE))
}
