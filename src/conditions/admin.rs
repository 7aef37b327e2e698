// SPDX-License-Identifier: MIT

//! Admin save path and editor data

use serde::Serialize;

use super::rule::{value_digest, MessageOverride, Rule, RuleAction};
use super::store::RuleStore;
use super::submission::{SaveCommand, SaveRequest, SAVE_ACTION};
use crate::host::{FieldId, Form, FormId, MetaStore, NotifyError};

/// Notice shown to the administrator after a successful save
pub const SAVED_NOTICE: &str = "Conditions have been successfully saved";

/// Host facility verifying the anti-forgery token of a request
pub trait RequestGuard {
    fn verify(&self, action: &str, token: Option<&str>) -> bool;
}

/// Accepts exactly one configured token
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl RequestGuard for StaticToken {
    fn verify(&self, _action: &str, token: Option<&str>) -> bool {
        token == Some(self.0.as_str())
    }
}

/// For callers already authenticated out of band, such as the local CLI
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedCaller;

impl RequestGuard for TrustedCaller {
    fn verify(&self, _action: &str, _token: Option<&str>) -> bool {
        true
    }
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub form_id: FormId,
    pub stored: usize,
    pub notice: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    pub value: String,
    pub label: String,
    pub digest: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub id: FieldId,
    pub label: String,
    pub choices: Vec<ChoiceView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionView {
    pub key: String,
    pub field: FieldId,
    pub value: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageOverride>,
}

/// Everything the condition editor renders for one form
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub form_id: FormId,
    pub title: String,
    pub conditional_fields: Vec<FieldView>,
    pub email_fields: Vec<FieldView>,
    pub conditions: Vec<ConditionView>,
    /// Notifications need at least one email field to address
    pub missing_email_field: bool,
}

/// Admin-side operations on a form's conditions
#[derive(Debug, Clone)]
pub struct ConditionsAdmin<M> {
    store: RuleStore<M>,
}

impl<M: MetaStore> ConditionsAdmin<M> {
    pub fn new(store: RuleStore<M>) -> Self {
        Self { store }
    }

    /// Verify and apply a save request.
    ///
    /// On any error the stored conditions are left as they were.
    pub fn handle(
        &self,
        form: &Form,
        request: SaveRequest,
        guard: &dyn RequestGuard,
    ) -> Result<SaveOutcome, NotifyError> {
        if !guard.verify(SAVE_ACTION, request.nonce.as_deref()) {
            log::warn!("Form {}: save request failed token check", request.form_id);
            return Err(NotifyError::forbidden(SAVE_ACTION));
        }
        if request.form_id != form.id {
            return Err(NotifyError::FormNotFound(request.form_id));
        }

        let stored = match request.command {
            SaveCommand::Clear => {
                self.store.clear(form)?;
                0
            }
            SaveCommand::Replace(rules) => self.apply(form, rules)?,
        };

        Ok(SaveOutcome {
            form_id: form.id,
            stored,
            notice: SAVED_NOTICE,
        })
    }

    fn apply(&self, form: &Form, rules: Vec<Rule>) -> Result<usize, NotifyError> {
        for rule in &rules {
            if let RuleAction::Send(message) = rule.action() {
                if !form.email_fields().any(|f| f.id == message.to_field) {
                    log::warn!(
                        "Form {}: condition {} = '{}' sends to field {}, which is not an email field",
                        form.id,
                        rule.field(),
                        rule.value(),
                        message.to_field
                    );
                }
            }
        }
        Ok(self.store.replace_all(form, rules)?.len())
    }

    /// Data for rendering the condition editor of `form`
    pub fn editor_view(&self, form: &Form) -> Result<EditorView, NotifyError> {
        let rules = self.store.load(form.id)?;

        let conditional_fields = form
            .conditional_fields()
            .map(|field| FieldView {
                id: field.id.clone(),
                label: field.label.clone(),
                choices: field
                    .choices
                    .iter()
                    .flatten()
                    .map(|c| ChoiceView {
                        value: c.value.clone(),
                        label: c.text.clone(),
                        digest: value_digest(&c.value),
                    })
                    .collect(),
            })
            .collect();

        let email_fields: Vec<FieldView> = form
            .email_fields()
            .map(|field| FieldView {
                id: field.id.clone(),
                label: field.label.clone(),
                choices: Vec::new(),
            })
            .collect();

        let conditions = rules
            .entries()
            .map(|(key, rule)| ConditionView {
                key: key.to_string(),
                field: rule.field().clone(),
                value: rule.value().to_string(),
                enabled: rule.enabled(),
                message: match rule.action() {
                    RuleAction::Send(m) => Some(m.clone()),
                    RuleAction::Suppress => None,
                },
            })
            .collect();

        Ok(EditorView {
            form_id: form.id,
            title: form.title.clone(),
            conditional_fields,
            missing_email_field: email_fields.is_empty(),
            email_fields,
            conditions,
        })
    }

    pub fn store(&self) -> &RuleStore<M> {
        &self.store
    }
}
