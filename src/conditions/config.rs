// SPDX-License-Identifier: MIT

//! Runtime settings from the environment

use std::path::PathBuf;

pub const STORE_DIR_VAR: &str = "CONDNOTIFY_STORE_DIR";
pub const FORMS_VAR: &str = "CONDNOTIFY_FORMS";
pub const ADMIN_EMAIL_VAR: &str = "CONDNOTIFY_ADMIN_EMAIL";
pub const NONCE_VAR: &str = "CONDNOTIFY_NONCE";

const DEFAULT_STORE_DIR: &str = "conditions";
const DEFAULT_FORMS: &str = "forms.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory of the file-backed metadata store
    pub store_dir: PathBuf,
    /// YAML file with the form definitions
    pub forms: PathBuf,
    /// Replaces the `{admin_email}` placeholder when logging messages
    pub admin_email: Option<String>,
    /// Token save requests must carry; unset means trusted caller
    pub nonce: Option<String>,
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            store_dir: get(STORE_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR)),
            forms: get(FORMS_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FORMS)),
            admin_email: get(ADMIN_EMAIL_VAR),
            nonce: get(NONCE_VAR),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
