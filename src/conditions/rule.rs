// SPDX-License-Identifier: MIT

//! Notification rules and their keys

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::host::{FieldId, Notification};

/// What a matching rule does to the default notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Send nothing for this submission
    Suppress,
    /// Send this message instead of the default
    Send(MessageOverride),
}

/// Message fields an enabled rule overrides
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct MessageOverride {
    pub subject: String,
    pub body: String,
    /// Blank means the site administrator address
    pub from_address: String,
    pub from_name: String,
    pub reply_to: String,
    pub to_field: FieldId,
}

impl MessageOverride {
    pub(crate) fn to_notification(&self, admin_placeholder: &str) -> Notification {
        let from_address = if self.from_address.trim().is_empty() {
            admin_placeholder.to_string()
        } else {
            self.from_address.clone()
        };

        Notification {
            subject: self.subject.clone(),
            body: self.body.clone(),
            from_address,
            from_name: self.from_name.clone(),
            reply_to: self.reply_to.clone(),
            to_field: self.to_field.clone(),
        }
    }
}

/// One condition: when `field` equals `value`, apply `action`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    field: FieldId,
    value: String,
    action: RuleAction,
}

impl Rule {
    pub fn new(field: impl Into<FieldId>, value: impl Into<String>, action: RuleAction) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            action,
        }
    }

    /// A rule that suppresses the notification on match
    pub fn suppress(field: impl Into<FieldId>, value: impl Into<String>) -> Self {
        Self::new(field, value, RuleAction::Suppress)
    }

    /// A rule that sends `message` on match
    pub fn send(
        field: impl Into<FieldId>,
        value: impl Into<String>,
        message: MessageOverride,
    ) -> Self {
        Self::new(field, value, RuleAction::Send(message))
    }

    pub fn field(&self) -> &FieldId {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    pub fn enabled(&self) -> bool {
        matches!(self.action, RuleAction::Send(_))
    }

    pub fn key(&self) -> RuleKey {
        RuleKey::new(&self.field, &self.value)
    }
}

/// Identity of a rule within a rule set: `<field>_<md5 hex of value>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RuleKey(String);

impl RuleKey {
    pub fn new(field: &FieldId, value: &str) -> Self {
        Self(format!("{}_{}", field, value_digest(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex digest of a choice value, also handed to the admin editor
pub fn value_digest(value: &str) -> String {
    format!("{:x}", Md5::digest(value.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ADMIN_EMAIL_PLACEHOLDER;

    #[test]
    fn test_key_is_field_and_md5() {
        let key = RuleKey::new(&FieldId::from(3), "no");
        assert_eq!(key.as_str(), "3_7fa3b767c460b54a2be4d49030b349c7");
        assert_eq!(value_digest(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_key_stability() {
        let a = Rule::suppress(3, "yes");
        let b = Rule::send(3, "yes", MessageOverride::default());
        assert_eq!(a.key(), b.key());

        assert_ne!(RuleKey::new(&FieldId::from(3), "yes"), RuleKey::new(&FieldId::from(3), "yes "));
        assert_ne!(RuleKey::new(&FieldId::from(3), "yes"), RuleKey::new(&FieldId::from(4), "yes"));
    }

    #[test]
    fn test_enabled_flag() {
        assert!(!Rule::suppress(1, "no").enabled());
        assert!(Rule::send(1, "yes", MessageOverride::default()).enabled());
    }

    #[test]
    fn test_blank_from_falls_back_to_placeholder() {
        let message = MessageOverride {
            subject: "Hi".to_string(),
            from_address: "  ".to_string(),
            to_field: FieldId::from(2),
            ..Default::default()
        };
        let notification = message.to_notification(ADMIN_EMAIL_PLACEHOLDER);
        assert_eq!(notification.from_address, ADMIN_EMAIL_PLACEHOLDER);
        assert_eq!(notification.subject, "Hi");

        let message = MessageOverride {
            from_address: "shop@example.com".to_string(),
            ..message
        };
        assert_eq!(
            message.to_notification(ADMIN_EMAIL_PLACEHOLDER).from_address,
            "shop@example.com"
        );
    }
}
