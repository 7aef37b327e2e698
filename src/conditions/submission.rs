// SPDX-License-Identifier: MIT

//! Admin save requests
//!
//! The editor posts one indexed parameter family per rule attribute, e.g.
//! `gfcn_notification_condition_field[3]=1` and
//! `gfcn_notification_condition_value[3]=no`. This module turns such a
//! request into a `SaveCommand`.

use indexmap::IndexMap;

use super::rule::{MessageOverride, Rule, RuleAction};
use crate::host::{FieldId, FormId, SubmissionError};

/// Token action the save form is signed with
pub const SAVE_ACTION: &str = "gfcn_save_notifications";

pub const SUBMIT: &str = "gfcn_submit";
pub const FORM_ID: &str = "gfcn_form_id";
pub const NONCE: &str = "gfcn_admin_nonce";

pub const FIELD: &str = "gfcn_notification_condition_field";
pub const VALUE: &str = "gfcn_notification_condition_value";
pub const STATUS: &str = "gfcn_notification_condition_status";
pub const MESSAGE: &str = "gfcn_notification_condition_message";
pub const SUBJECT: &str = "gfcn_notification_condition_subject";
pub const FROM: &str = "gfcn_notification_condition_from";
pub const REPLY: &str = "gfcn_notification_condition_reply";
pub const FROM_NAME: &str = "gfcn_notification_condition_from_name";
pub const TO: &str = "gfcn_notification_condition_to";

const REQUIRED_FAMILIES: [&str; 9] = [
    FIELD, VALUE, STATUS, MESSAGE, SUBJECT, FROM, REPLY, FROM_NAME, TO,
];

/// What a save request asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveCommand {
    /// Drop every condition of the form
    Clear,
    /// Replace the conditions with these rules, in submitted order
    Replace(Vec<Rule>),
}

/// A parsed admin save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub form_id: FormId,
    pub nonce: Option<String>,
    pub command: SaveCommand,
}

type Family = IndexMap<String, String>;

impl SaveRequest {
    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &str) -> Result<Option<Self>, SubmissionError> {
        Self::from_pairs(url::form_urlencoded::parse(body.as_bytes()).into_owned())
    }

    /// Parse decoded request parameters.
    ///
    /// Returns `Ok(None)` when the request is not a condition save at all.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Option<Self>, SubmissionError> {
        let mut scalars: IndexMap<String, String> = IndexMap::new();
        let mut families: IndexMap<String, Family> = IndexMap::new();
        // `name[]` appends after the largest integer index seen so far
        let mut next_index: IndexMap<String, i64> = IndexMap::new();

        for (name, value) in pairs {
            match split_indexed(&name) {
                Some((family, index)) => {
                    let next = next_index.entry(family.to_string()).or_insert(0);
                    let index = match index {
                        "" => {
                            *next += 1;
                            (*next - 1).to_string()
                        }
                        i => {
                            if let Ok(n) = i.parse::<i64>() {
                                *next = (*next).max(n.saturating_add(1));
                            }
                            i.to_string()
                        }
                    };
                    families
                        .entry(family.to_string())
                        .or_default()
                        .insert(index, value);
                }
                None => {
                    scalars.insert(name, value);
                }
            }
        }

        if !scalars.contains_key(SUBMIT) {
            return Ok(None);
        }

        let raw_id = scalars.get(FORM_ID).map(String::as_str).unwrap_or("");
        let form_id = raw_id
            .trim()
            .parse::<FormId>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| SubmissionError::InvalidFormId(raw_id.to_string()))?;
        let nonce = scalars.get(NONCE).cloned();

        // A bare parameter counts as a single condition at index 0
        for (name, value) in &scalars {
            if REQUIRED_FAMILIES.contains(&name.as_str()) {
                families
                    .entry(name.clone())
                    .or_default()
                    .entry("0".to_string())
                    .or_insert_with(|| value.clone());
            }
        }

        if [FIELD, VALUE, STATUS, MESSAGE]
            .iter()
            .all(|family| !families.contains_key(*family))
        {
            return Ok(Some(Self {
                form_id,
                nonce,
                command: SaveCommand::Clear,
            }));
        }

        for family in REQUIRED_FAMILIES {
            if !families.contains_key(family) {
                return Err(SubmissionError::MissingParameter(family.to_string()));
            }
        }

        let empty = Family::new();
        let family = |name: &str| families.get(name).unwrap_or(&empty);

        let mut rules = Vec::new();
        for (index, field) in family(FIELD) {
            let required = |name: &str| {
                family(name)
                    .get(index)
                    .ok_or_else(|| SubmissionError::MissingIndexedValue {
                        parameter: name.to_string(),
                        index: index.clone(),
                    })
            };
            let value = required(VALUE)?;
            let status = required(STATUS)?;

            let action = if is_truthy(status) {
                let text = |name: &str| family(name).get(index).cloned().unwrap_or_default();
                RuleAction::Send(MessageOverride {
                    subject: text(SUBJECT),
                    body: text(MESSAGE),
                    from_address: text(FROM),
                    from_name: text(FROM_NAME),
                    reply_to: text(REPLY),
                    to_field: FieldId::from(text(TO)),
                })
            } else {
                RuleAction::Suppress
            };

            rules.push(Rule::new(field.as_str(), value.as_str(), action));
        }

        Ok(Some(Self {
            form_id,
            nonce,
            command: SaveCommand::Replace(rules),
        }))
    }
}

/// `name[index]` -> (`name`, `index`)
fn split_indexed(name: &str) -> Option<(&str, &str)> {
    let open = name.find('[')?;
    let index = name[open + 1..].strip_suffix(']')?;
    Some((&name[..open], index))
}

/// Loose boolean cast of a request value: `""` and `"0"` are false
fn is_truthy(value: &str) -> bool {
    !(value.is_empty() || value == "0")
}
