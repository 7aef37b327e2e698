// SPDX-License-Identifier: MIT

//! Form definitions supplied by the host

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Host form identifier
pub type FormId = u64;

/// Field types the admin editor offers as conditions
pub const CONDITIONAL_FIELD_TYPES: [&str; 3] = ["select", "checkbox", "radio"];

/// Opaque host field identifier
///
/// Hosts hand out integers or strings; both compare by their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldId(String);

impl FieldId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for FieldId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for FieldId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldId {
    Int(i64),
    Float(f64),
    Str(String),
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawFieldId::deserialize(deserializer)? {
            RawFieldId::Int(n) => Self(n.to_string()),
            // Sub-input ids such as 4.1. Numeric ids are normalised through
            // the float value, so `4.10` reads as "4.1" and `4.0` as "4".
            // Hosts that need the literal text must send a string.
            RawFieldId::Float(n) => Self(n.to_string()),
            RawFieldId::Str(s) => Self(s),
        })
    }
}

/// One discrete choice of a field
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Choice {
    pub value: String,
    #[serde(default)]
    pub text: String,
}

/// A host form field
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub label: String,
    /// Absent for free-text fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

impl Field {
    pub fn has_choice(&self, value: &str) -> bool {
        self.choices
            .as_ref()
            .is_some_and(|choices| choices.iter().any(|c| c.value == value))
    }

    pub fn is_email(&self) -> bool {
        self.field_type == "email"
    }
}

/// A host form with its ordered fields
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Form {
    pub id: FormId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Form {
    /// Fields that can carry a notification condition
    pub fn conditional_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| {
            CONDITIONAL_FIELD_TYPES.contains(&f.field_type.as_str()) && f.choices.is_some()
        })
    }

    /// Fields a notification can be addressed to
    pub fn email_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_email())
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }
}
