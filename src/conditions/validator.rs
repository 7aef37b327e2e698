// SPDX-License-Identifier: MIT

//! Rule validation against a form's field definitions
//!
//! A rule is valid only when its field exists and offers a discrete choice
//! whose value equals the rule value. Free-text fields never validate.

use super::rule::Rule;
use crate::host::{Field, ValidationError};

/// Check a rule, reporting why it is rejected
pub fn check(fields: &[Field], rule: &Rule) -> Result<(), ValidationError> {
    let mut found = false;
    let mut has_choices = false;

    // Hosts may repeat an id; any matching definition can validate the rule
    for field in fields.iter().filter(|f| f.id == *rule.field()) {
        found = true;
        if field.choices.is_some() {
            has_choices = true;
        }
        if field.has_choice(rule.value()) {
            return Ok(());
        }
    }

    Err(if !found {
        ValidationError::UnknownField {
            field: rule.field().clone(),
        }
    } else if !has_choices {
        ValidationError::NoChoices {
            field: rule.field().clone(),
        }
    } else {
        ValidationError::UnknownChoice {
            field: rule.field().clone(),
            value: rule.value().to_string(),
        }
    })
}

/// Whether a single rule is valid for these fields
pub fn validate(fields: &[Field], rule: &Rule) -> bool {
    check(fields, rule).is_ok()
}

/// Whether every rule is valid for these fields
pub fn validate_all<'a>(fields: &[Field], rules: impl IntoIterator<Item = &'a Rule>) -> bool {
    rules.into_iter().all(|rule| validate(fields, rule))
}

/// First invalid rule, if any
pub fn check_all<'a>(
    fields: &[Field],
    rules: impl IntoIterator<Item = &'a Rule>,
) -> Result<(), ValidationError> {
    rules.into_iter().try_for_each(|rule| check(fields, rule))
}
