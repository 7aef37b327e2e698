// SPDX-License-Identifier: MIT

//! Form definition loader - YAML file loading and parsing
//!
//! Stands in for the host's form registry when the crate runs on its own.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::host::{Form, FormId, NotifyError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FormsFile {
    Many { forms: Vec<Form> },
    One(Form),
}

/// Loads form definitions from YAML files
pub struct FormLoader;

impl FormLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every form defined in a YAML file
    pub fn load_forms<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Form>, NotifyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            NotifyError::config(format!("cannot read forms file {}: {}", path.display(), e))
        })?;
        Self::parse_yaml(&content)
    }

    /// Load one form by id
    pub fn load_form<P: AsRef<Path>>(&self, path: P, id: FormId) -> Result<Form, NotifyError> {
        self.load_forms(path)?
            .into_iter()
            .find(|form| form.id == id)
            .ok_or(NotifyError::FormNotFound(id))
    }

    /// Parse form definitions from a YAML string: either a single form or a `forms:` list
    pub fn parse_yaml(content: &str) -> Result<Vec<Form>, NotifyError> {
        let file: FormsFile = serde_yaml::from_str(content)?;
        Ok(match file {
            FormsFile::Many { forms } => forms,
            FormsFile::One(form) => vec![form],
        })
    }
}

impl Default for FormLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FieldId;

    #[test]
    fn test_parse_single_form() {
        let yaml = r#"
id: 3
title: Contact
fields:
  - id: 1
    type: radio
    label: Reply wanted
    choices:
      - value: "yes"
        text: "Yes please"
      - value: "no"
        text: "No thanks"
  - id: 2
    type: email
    label: Email
"#;
        let forms = FormLoader::parse_yaml(yaml).unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].id, 3);
        assert_eq!(forms[0].fields.len(), 2);

        let choices = forms[0].fields[0].choices.as_ref().unwrap();
        assert_eq!(choices[1].value, "no");
        assert_eq!(choices[1].text, "No thanks");
        assert!(forms[0].fields[1].choices.is_none());
    }

    #[test]
    fn test_parse_form_list() {
        let yaml = r#"
forms:
  - id: 1
    title: First
    fields: []
  - id: 2
    title: Second
    fields:
      - { id: "7", type: text }
"#;
        let forms = FormLoader::parse_yaml(yaml).unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[1].fields[0].id, FieldId::from(7));
        assert_eq!(forms[1].fields[0].label, "");
    }

    #[test]
    fn test_invalid_yaml_returns_error() {
        let yaml = r#"
id:
  - invalid structure
"#;
        assert!(FormLoader::parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = FormLoader::new()
            .load_forms("/nonexistent/forms.yaml")
            .unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }
}
