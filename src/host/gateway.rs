// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::error::NotifyError;
use super::form::{FieldId, Form};
use super::record::Record;

/// Stands for the site administrator address until the host resolves it
pub const ADMIN_EMAIL_PLACEHOLDER: &str = "{admin_email}";

/// An overridden auto-responder message
///
/// Placeholders in `subject` and `body` are left for the host to expand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub from_address: String,
    pub from_name: String,
    pub reply_to: String,
    /// Email-type field holding the recipient
    pub to_field: FieldId,
}

/// Host facility that delivers a notification.
///
/// Implementations resolve `to_field` against the record and expand placeholders.
pub trait NotificationGateway: Send + Sync {
    fn send(&self, form: &Form, record: &Record, message: &Notification)
        -> Result<(), NotifyError>;
}

/// Gateway that writes messages to the log instead of mailing them
#[derive(Debug, Clone, Default)]
pub struct LogGateway {
    admin_email: Option<String>,
}

impl LogGateway {
    pub fn new(admin_email: Option<String>) -> Self {
        Self { admin_email }
    }

    fn resolve_from<'a>(&'a self, from: &'a str) -> &'a str {
        match &self.admin_email {
            Some(admin) if from == ADMIN_EMAIL_PLACEHOLDER => admin.as_str(),
            _ => from,
        }
    }
}

impl NotificationGateway for LogGateway {
    fn send(
        &self,
        form: &Form,
        record: &Record,
        message: &Notification,
    ) -> Result<(), NotifyError> {
        let to = record.first(&message.to_field).ok_or_else(|| {
            NotifyError::delivery(format!(
                "record has no recipient in field {}",
                message.to_field
            ))
        })?;

        log::info!(
            "Form {}: notifying {} from {} <{}> (reply-to '{}'): {}",
            form.id,
            to,
            message.from_name,
            self.resolve_from(&message.from_address),
            message.reply_to,
            message.subject
        );
        log::debug!("Message body:\n{}", message.body);
        Ok(())
    }
}
