// SPDX-License-Identifier: MIT

//! Serialized form of a rule set
//!
//! The blob is a JSON object keyed `<field>_<md5(value)>`, each entry a flat
//! record. Override slots of suppressing rules are stored as `false`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::set::RuleSet;
use crate::conditions::rule::{MessageOverride, Rule, RuleAction};
use crate::host::{FieldId, FormId, StorageError};

/// A slot that holds a value for enabled rules and `false` otherwise
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
enum Slot<T> {
    Set(T),
    Unset(bool),
}

impl<T: Default> Slot<T> {
    fn into_value(slot: Option<Self>) -> T {
        match slot {
            Some(Slot::Set(v)) => v,
            _ => T::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredRule {
    #[serde(default)]
    field: FieldId,
    #[serde(default)]
    value: String,
    #[serde(default)]
    status: bool,
    #[serde(default)]
    message: Option<Slot<String>>,
    #[serde(default)]
    subject: Option<Slot<String>>,
    #[serde(default)]
    to_field: Option<Slot<FieldId>>,
    #[serde(default)]
    from: Option<Slot<String>>,
    #[serde(default)]
    from_name: Option<Slot<String>>,
    #[serde(default)]
    reply_to: Option<Slot<String>>,
}

impl From<&Rule> for StoredRule {
    fn from(rule: &Rule) -> Self {
        let unset = || Some(Slot::Unset(false));
        match rule.action() {
            RuleAction::Suppress => Self {
                field: rule.field().clone(),
                value: rule.value().to_string(),
                status: false,
                message: unset(),
                subject: unset(),
                to_field: Some(Slot::Unset(false)),
                from: unset(),
                from_name: unset(),
                reply_to: unset(),
            },
            RuleAction::Send(m) => Self {
                field: rule.field().clone(),
                value: rule.value().to_string(),
                status: true,
                message: Some(Slot::Set(m.body.clone())),
                subject: Some(Slot::Set(m.subject.clone())),
                to_field: Some(Slot::Set(m.to_field.clone())),
                from: Some(Slot::Set(m.from_address.clone())),
                from_name: Some(Slot::Set(m.from_name.clone())),
                reply_to: Some(Slot::Set(m.reply_to.clone())),
            },
        }
    }
}

impl From<StoredRule> for Rule {
    fn from(stored: StoredRule) -> Self {
        let action = if stored.status {
            let to_field = match stored.to_field {
                Some(Slot::Set(id)) => id,
                _ => FieldId::from(0),
            };
            RuleAction::Send(MessageOverride {
                subject: Slot::into_value(stored.subject),
                body: Slot::into_value(stored.message),
                from_address: Slot::into_value(stored.from),
                from_name: Slot::into_value(stored.from_name),
                reply_to: Slot::into_value(stored.reply_to),
                to_field,
            })
        } else {
            RuleAction::Suppress
        };
        Rule::new(stored.field, stored.value, action)
    }
}

/// Serialize a rule set to its blob
pub fn encode(set: &RuleSet) -> Result<String, serde_json::Error> {
    let stored: IndexMap<&str, StoredRule> = set
        .entries()
        .map(|(key, rule)| (key.as_str(), StoredRule::from(rule)))
        .collect();
    serde_json::to_string(&stored)
}

/// Parse a blob back into a rule set.
///
/// Keys are recomputed from field and value; a stored key that disagrees is
/// replaced.
pub fn decode(form: FormId, blob: &str) -> Result<RuleSet, StorageError> {
    let stored: IndexMap<String, StoredRule> = serde_json::from_str(blob)
        .map_err(|source| StorageError::Corrupt { form, source })?;

    let mut set = RuleSet::empty(form);
    for (stored_key, entry) in stored {
        let rule = Rule::from(entry);
        if rule.key().as_str() != stored_key {
            log::warn!(
                "Form {}: stored condition key {} re-keyed to {}",
                form,
                stored_key,
                rule.key()
            );
        }
        set = set.with(rule);
    }
    Ok(set)
}
