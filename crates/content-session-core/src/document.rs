//! Per-language content documents and the item shapes they contain.
//!
//! A document is a JSON object. Content ids are dot-separated paths into it
//! (`"home.hero.title"`, `"list.0.label"`). Leaves are either plain strings
//! (text items) or objects tagged with `contentstorage_type`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Variable bag used for `{{name}}` substitution.
pub type Variables = HashMap<String, Value>;

/// Variation selected when no explicit variation id is given.
pub const DEFAULT_VARIATION: &str = "default";

/// Resolved text lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// Image payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub url: String,
    #[serde(default)]
    pub alt_text: String,
}

/// Resolved image lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub data: Option<ImageData>,
}

/// Structured (non-text) items.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "contentstorage_type", rename_all = "snake_case")]
enum RichItem {
    Image(ImageData),
    Variation { data: Map<String, Value> },
}

/// One language's parsed content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentDocument {
    root: Value,
}

impl ContentDocument {
    /// Wrap an already-parsed JSON document.
    #[must_use]
    pub const fn new(root: Value) -> Self {
        Self { root }
    }

    /// Walk a dot-separated content id.
    #[must_use]
    pub fn resolve(&self, content_id: &str) -> Option<&Value> {
        if content_id.is_empty() {
            return None;
        }
        content_id
            .split('.')
            .try_fold(&self.root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Text for `content_id`, with variables substituted.
    #[must_use]
    pub fn text(&self, content_id: &str, variables: Option<&Variables>) -> Option<String> {
        match self.resolve(content_id)? {
            Value::String(template) => Some(substitute(template, variables)),
            _ => None,
        }
    }

    /// Image for `content_id`, if the item is an image.
    #[must_use]
    pub fn image(&self, content_id: &str) -> Option<ImageData> {
        match RichItem::deserialize(self.resolve(content_id)?).ok()? {
            RichItem::Image(data) => Some(data),
            RichItem::Variation { .. } => None,
        }
    }

    /// Variation value for `content_id`.
    ///
    /// Without a `variation_id` the [`DEFAULT_VARIATION`] entry is used.
    #[must_use]
    pub fn variation(
        &self,
        content_id: &str,
        variation_id: Option<&str>,
        variables: Option<&Variables>,
    ) -> Option<String> {
        let RichItem::Variation { data } = RichItem::deserialize(self.resolve(content_id)?).ok()?
        else {
            return None;
        };
        match data.get(variation_id.unwrap_or(DEFAULT_VARIATION))? {
            Value::String(template) => Some(substitute(template, variables)),
            _ => None,
        }
    }
}

impl From<Value> for ContentDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Replace `{{name}}` placeholders from `variables`.
///
/// Whitespace inside the braces is ignored. Placeholders with no matching
/// variable are left untouched.
#[must_use]
pub fn substitute(template: &str, variables: Option<&Variables>) -> String {
    let Some(variables) = variables.filter(|v| !v.is_empty()) else {
        return template.to_string();
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let name = rest[start + 2..start + 2 + len].trim();
        out.push_str(&rest[..start]);
        match variables.get(name) {
            Some(Value::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&other.to_string()),
            None => out.push_str(&rest[start..start + len + 4]),
        }
        rest = &rest[start + len + 4..];
    }
    out.push_str(rest);
    out
}
