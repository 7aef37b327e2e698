// SPDX-License-Identifier: MIT

//! Host platform contracts
//!
//! The host owns forms, records, persistence and delivery. This module
//! describes what the core consumes from it:
//! - `Form` / `Field` - form definitions with optional discrete choices
//! - `Record` - one submitted entry
//! - `MetaStore` - per-form metadata blobs
//! - `NotificationGateway` - the mailer

pub mod error;
pub mod form;
pub mod gateway;
pub mod meta;
pub mod record;

pub use error::{NotifyError, StorageError, SubmissionError, ValidationError};
pub use form::{Choice, Field, FieldId, Form, FormId};
pub use gateway::{LogGateway, Notification, NotificationGateway, ADMIN_EMAIL_PLACEHOLDER};
pub use meta::{FileMeta, MemoryMeta, MetaStore};
pub use record::{FieldValue, Record};
