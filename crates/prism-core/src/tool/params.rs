//! Typed accessors over a tool call's untyped `parameters` object.
//!
//! Absent keys and JSON `null` are treated the same. Required string fields
//! must also be non-blank.

use prism_types::error::ToolError;
use serde_json::{Map, Value};

/// Borrowed view of a parameters object.
#[derive(Debug, Clone, Copy)]
pub struct ToolParams<'a> {
    map: Option<&'a Map<String, Value>>,
    /// Prefix used in error messages for nested objects (e.g. `goal_data.`).
    prefix: &'static str,
}

impl<'a> ToolParams<'a> {
    /// Wrap a parameters value. `null` is an empty object; anything else
    /// that is not an object is rejected.
    pub fn new(value: &'a Value) -> Result<Self, ToolError> {
        Self::nested(value, "parameters", "")
    }

    fn nested(value: &'a Value, field: &str, prefix: &'static str) -> Result<Self, ToolError> {
        match value {
            Value::Null => Ok(Self { map: None, prefix }),
            Value::Object(map) => Ok(Self {
                map: Some(map),
                prefix,
            }),
            _ => Err(ToolError::invalid(field, "expected an object")),
        }
    }

    fn name(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Raw value for a key, with `null` folded into absence.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|m| m.get(key))
            .filter(|v| !v.is_null())
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ToolError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ToolError::invalid(&self.name(key), "expected a string")),
        }
    }

    pub fn required_str(&self, key: &str) -> Result<&'a str, ToolError> {
        match self.optional_str(key)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(ToolError::MissingField(self.name(key))),
        }
    }

    pub fn optional_i64(&self, key: &str) -> Result<Option<i64>, ToolError> {
        match self.value(key) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| ToolError::invalid(&self.name(key), "expected an integer")),
        }
    }

    pub fn required_i64(&self, key: &str) -> Result<i64, ToolError> {
        self.optional_i64(key)?
            .ok_or_else(|| ToolError::MissingField(self.name(key)))
    }

    /// A nested object parameter, viewed with its own accessors.
    pub fn optional_object(
        &self,
        key: &str,
        prefix: &'static str,
    ) -> Result<Option<ToolParams<'a>>, ToolError> {
        match self.value(key) {
            None => Ok(None),
            Some(v) => Self::nested(v, &self.name(key), prefix).map(Some),
        }
    }

    /// The `action` discriminant.
    pub fn action(&self) -> Result<&'a str, ToolError> {
        self.required_str("action")
    }
}
