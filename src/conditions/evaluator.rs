// SPDX-License-Identifier: MIT

//! Rule evaluation for a submitted record
//!
//! Rules are OR-combined: the first rule along stored order whose field is
//! present in the record with the rule's value decides. Authors are expected
//! to write non-overlapping conditions.

use serde::Serialize;

use super::rule::RuleAction;
use super::store::RuleSet;
use super::validator;
use crate::host::{Form, Notification, Record, ADMIN_EMAIL_PLACEHOLDER};

/// Outcome of evaluating a record against a rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "message", rename_all = "lowercase")]
pub enum Decision {
    /// Fall back to the host's default notification
    Defer,
    /// Send nothing for this submission
    Suppress,
    /// Send exactly this message and not the default
    Override(Notification),
}

impl Decision {
    /// Whether the host's default notification must not be sent
    pub fn disables_default(&self) -> bool {
        !matches!(self, Decision::Defer)
    }
}

/// Decide what happens to the notification of `record`.
///
/// Never fails: an empty or invalid rule set defers to the host.
pub fn decide(form: &Form, rules: &RuleSet, record: &Record) -> Decision {
    if rules.is_empty() {
        return Decision::Defer;
    }

    if let Err(e) = validator::check_all(&form.fields, rules) {
        log::warn!(
            "Form {}: stored conditions no longer match the form ({}), using default notification",
            form.id,
            e
        );
        return Decision::Defer;
    }

    for rule in rules {
        let Some(submitted) = record.get(rule.field()) else {
            log::debug!("Field {} absent from record, skipping", rule.field());
            continue;
        };
        if !submitted.matches(rule.value()) {
            continue;
        }

        log::debug!(
            "Form {}: condition {} = '{}' matched",
            form.id,
            rule.field(),
            rule.value()
        );
        return match rule.action() {
            RuleAction::Suppress => Decision::Suppress,
            RuleAction::Send(message) => {
                Decision::Override(message.to_notification(ADMIN_EMAIL_PLACEHOLDER))
            }
        };
    }

    Decision::Defer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::rule::{MessageOverride, Rule};
    use crate::host::{Choice, Field, FieldId, FieldValue};

    fn form() -> Form {
        let choices = |values: &[&str]| -> Option<Vec<Choice>> {
            Some(
                values
                    .iter()
                    .map(|v| Choice {
                        value: v.to_string(),
                        text: v.to_string(),
                    })
                    .collect(),
            )
        };
        Form {
            id: 1,
            title: "Signup".to_string(),
            fields: vec![
                Field {
                    id: FieldId::from("F1"),
                    field_type: "radio".to_string(),
                    label: "Subscribe".to_string(),
                    choices: choices(&["yes", "no"]),
                },
                Field {
                    id: FieldId::from("F2"),
                    field_type: "email".to_string(),
                    label: "Email".to_string(),
                    choices: None,
                },
                Field {
                    id: FieldId::from("F3"),
                    field_type: "checkbox".to_string(),
                    label: "Topics".to_string(),
                    choices: choices(&["news", "offers"]),
                },
            ],
        }
    }

    fn hi() -> MessageOverride {
        MessageOverride {
            subject: "Hi".to_string(),
            body: "Hello there".to_string(),
            to_field: FieldId::from("F2"),
            ..Default::default()
        }
    }

    fn set(rules: Vec<Rule>) -> RuleSet {
        RuleSet::from_rules(1, rules)
    }

    #[test]
    fn test_suppress_scenario() {
        let rules = set(vec![Rule::suppress("F1", "no")]);

        let record = Record::new().with("F1", "no");
        assert_eq!(decide(&form(), &rules, &record), Decision::Suppress);

        let record = Record::new().with("F1", "yes");
        assert_eq!(decide(&form(), &rules, &record), Decision::Defer);

        assert_eq!(decide(&form(), &rules, &Record::new()), Decision::Defer);
    }

    #[test]
    fn test_override_scenario() {
        let rules = set(vec![
            Rule::suppress("F1", "no"),
            Rule::send("F1", "yes", hi()),
        ]);
        let record = Record::new().with("F1", "yes");

        match decide(&form(), &rules, &record) {
            Decision::Override(message) => {
                assert_eq!(message.subject, "Hi");
                assert_eq!(message.body, "Hello there");
                assert_eq!(message.to_field, FieldId::from("F2"));
                assert_eq!(message.from_address, ADMIN_EMAIL_PLACEHOLDER);
            }
            other => panic!("Expected Override, got {:?}", other),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let record = Record::new().with("F1", "no").with(
            "F3",
            FieldValue::Multiple(vec!["news".to_string()]),
        );

        let rules = set(vec![Rule::send("F3", "news", hi()), Rule::suppress("F1", "no")]);
        assert!(matches!(
            decide(&form(), &rules, &record),
            Decision::Override(_)
        ));

        let rules = set(vec![Rule::suppress("F1", "no"), Rule::send("F3", "news", hi())]);
        assert_eq!(decide(&form(), &rules, &record), Decision::Suppress);
    }

    #[test]
    fn test_absent_field_is_skipped() {
        let rules = set(vec![Rule::suppress("F3", "offers"), Rule::send("F1", "yes", hi())]);
        let record = Record::new().with("F1", "yes");

        assert!(matches!(
            decide(&form(), &rules, &record),
            Decision::Override(_)
        ));
    }

    #[test]
    fn test_empty_rules_defer() {
        let record = Record::new().with("F1", "no");
        assert_eq!(decide(&form(), &set(vec![]), &record), Decision::Defer);
    }

    #[test]
    fn test_invalid_rules_defer() {
        // A choice removed from the form after the rules were saved
        let rules = set(vec![Rule::suppress("F1", "no"), Rule::suppress("F1", "maybe")]);
        let record = Record::new().with("F1", "no");

        assert_eq!(decide(&form(), &rules, &record), Decision::Defer);
    }

    #[test]
    fn test_multi_value_entry_matches_any() {
        let rules = set(vec![Rule::suppress("F3", "offers")]);
        let record = Record::new().with(
            "F3",
            FieldValue::Multiple(vec!["news".to_string(), "offers".to_string()]),
        );
        assert_eq!(decide(&form(), &rules, &record), Decision::Suppress);
    }

    #[test]
    fn test_disables_default() {
        assert!(!Decision::Defer.disables_default());
        assert!(Decision::Suppress.disables_default());
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(Decision::Suppress).unwrap();
        assert_eq!(json, serde_json::json!({"decision": "suppress"}));
    }
}
