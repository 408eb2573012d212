//! Shape checks for backend responses

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconListError {
    #[error("body is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("expected a JSON array, got {found}")]
    NotAnArray { found: &'static str },

    #[error("element {index}: expected a string, got {found}")]
    NotAString { index: usize, found: &'static str },

    #[error("element {index}: {value:?} is not a valid URL ({reason})")]
    InvalidUrl { index: usize, value: String, reason: String },
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered list of icon URLs, accepted only if every element is a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IconList(Vec<String>);

impl IconList {
    pub fn from_slice(body: &[u8]) -> Result<Self, IconListError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// The whole list is rejected on the first bad element; nothing is filtered.
    pub fn from_value(value: Value) -> Result<Self, IconListError> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(IconListError::NotAnArray { found: kind(&other) }),
        };

        let mut urls = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let url = match item {
                Value::String(s) => s,
                other => {
                    return Err(IconListError::NotAString { index, found: kind(&other) });
                }
            };
            if let Err(e) = Url::parse(&url) {
                return Err(IconListError::InvalidUrl {
                    index,
                    value: url,
                    reason: e.to_string(),
                });
            }
            urls.push(url);
        }

        Ok(Self(urls))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
