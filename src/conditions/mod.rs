// SPDX-License-Identifier: MIT

//! Conditional notifications
//!
//! Per-field-value rules that override or suppress the default
//! auto-responder of a form:
//! - `rule` / `validator` - rule values and their validity for a form
//! - `store` - ordered rule sets, persistence and the stored blob format
//! - `evaluator` - the `Defer` / `Suppress` / `Override` decision
//! - `submission` / `admin` - the admin save path
//! - `hook` - the adapter the host calls before notifying

pub mod admin;
pub mod config;
pub mod evaluator;
pub mod hook;
pub mod loader;
pub mod rule;
pub mod store;
pub mod submission;
pub mod validator;

pub use admin::{ConditionsAdmin, RequestGuard, SaveOutcome, StaticToken, TrustedCaller};
pub use config::Settings;
pub use evaluator::{decide, Decision};
pub use hook::ConditionalNotifications;
pub use loader::FormLoader;
pub use rule::{MessageOverride, Rule, RuleAction, RuleKey};
pub use store::{RuleSet, RuleStore};
pub use submission::{SaveCommand, SaveRequest};
pub use validator::{validate, validate_all};
