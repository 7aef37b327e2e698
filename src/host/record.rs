// SPDX-License-Identifier: MIT

//! Submitted records (read-only to the core)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::form::FieldId;

/// The submitted value(s) of one field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Whether the submitted value equals `expected`; any element counts for multi-value entries
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            FieldValue::Single(v) => v == expected,
            FieldValue::Multiple(values) => values.iter().any(|v| v == expected),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(s.to_string())
    }
}

/// One form submission: field id to submitted value(s)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<FieldId, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<FieldId>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<FieldId>, value: impl Into<FieldValue>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &FieldId) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// First submitted value of a field, used to resolve recipients
    pub fn first(&self, field: &FieldId) -> Option<&str> {
        match self.values.get(field)? {
            FieldValue::Single(v) => Some(v.as_str()),
            FieldValue::Multiple(values) => values.first().map(String::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_json() {
        let record: Record =
            serde_json::from_str(r#"{"1": "no", "2": "a@example.com", "5": ["x", "y"]}"#).unwrap();

        assert_eq!(record.get(&FieldId::from(1)), Some(&FieldValue::from("no")));
        assert_eq!(record.first(&FieldId::from(2)), Some("a@example.com"));
        assert_eq!(record.first(&FieldId::from(5)), Some("x"));
        assert!(record.get(&FieldId::from(9)).is_none());
    }

    #[test]
    fn test_field_value_matches() {
        assert!(FieldValue::from("no").matches("no"));
        assert!(!FieldValue::from("no").matches("No"));

        let multi = FieldValue::Multiple(vec!["red".to_string(), "blue".to_string()]);
        assert!(multi.matches("blue"));
        assert!(!multi.matches("green"));
        assert!(!FieldValue::Multiple(vec![]).matches(""));
    }
}
