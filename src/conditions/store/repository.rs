// SPDX-License-Identifier: MIT

//! Rule persistence through the host's metadata primitive

use super::codec;
use super::set::RuleSet;
use crate::conditions::rule::Rule;
use crate::conditions::validator;
use crate::host::{Form, FormId, MetaStore, NotifyError};

/// Loads and wholesale-replaces the rule set of a form
#[derive(Debug, Clone)]
pub struct RuleStore<M> {
    meta: M,
}

impl<M: MetaStore> RuleStore<M> {
    pub fn new(meta: M) -> Self {
        Self { meta }
    }

    /// Load the rules of a form; a form without rules yields an empty set
    pub fn load(&self, form: FormId) -> Result<RuleSet, NotifyError> {
        match self.meta.read(form)? {
            Some(blob) => Ok(codec::decode(form, &blob)?),
            None => Ok(RuleSet::empty(form)),
        }
    }

    /// Replace every rule of `form` with `rules`.
    ///
    /// Nothing is written unless every rule validates against the form's
    /// fields. Rules sharing a key collapse, last one wins.
    pub fn replace_all(&self, form: &Form, rules: Vec<Rule>) -> Result<RuleSet, NotifyError> {
        if let Err(e) = validator::check_all(&form.fields, &rules) {
            log::warn!("Form {}: rejected condition save: {}", form.id, e);
            return Err(e.into());
        }

        let set = RuleSet::from_rules(form.id, rules);
        if set.is_empty() {
            self.meta.remove(form.id)?;
        } else {
            self.meta.write(form.id, codec::encode(&set)?)?;
        }

        log::info!("Form {}: saved {} condition(s)", form.id, set.len());
        Ok(set)
    }

    /// Remove every rule of a form
    pub fn clear(&self, form: &Form) -> Result<(), NotifyError> {
        self.replace_all(form, Vec::new()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::rule::MessageOverride;
    use crate::host::{Choice, Field, FieldId, MemoryMeta};

    fn form() -> Form {
        Form {
            id: 1,
            title: "Signup".to_string(),
            fields: vec![Field {
                id: FieldId::from(1),
                field_type: "radio".to_string(),
                label: "Newsletter".to_string(),
                choices: Some(vec![
                    Choice {
                        value: "yes".to_string(),
                        text: "Yes".to_string(),
                    },
                    Choice {
                        value: "no".to_string(),
                        text: "No".to_string(),
                    },
                ]),
            }],
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = RuleStore::new(MemoryMeta::new());
        let set = store.load(42).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.form(), 42);
    }

    #[test]
    fn test_replace_then_load() {
        let store = RuleStore::new(MemoryMeta::new());
        let rules = vec![
            Rule::suppress(1, "no"),
            Rule::send(
                1,
                "yes",
                MessageOverride {
                    subject: "Hi".to_string(),
                    ..Default::default()
                },
            ),
        ];

        let saved = store.replace_all(&form(), rules.clone()).unwrap();
        let loaded = store.load(1).unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.iter().cloned().collect::<Vec<_>>(), rules);
    }

    #[test]
    fn test_invalid_save_keeps_previous_rules() {
        let store = RuleStore::new(MemoryMeta::new());
        store
            .replace_all(&form(), vec![Rule::suppress(1, "no")])
            .unwrap();

        let err = store
            .replace_all(
                &form(),
                vec![Rule::suppress(1, "yes"), Rule::suppress(1, "maybe")],
            )
            .unwrap_err();
        assert!(err.is_validation());

        let loaded = store.load(1).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.iter().next().unwrap(), &Rule::suppress(1, "no"));
    }

    #[test]
    fn test_clear() {
        let meta = MemoryMeta::new();
        let store = RuleStore::new(meta.clone());
        store
            .replace_all(&form(), vec![Rule::suppress(1, "no")])
            .unwrap();

        store.clear(&form()).unwrap();
        assert!(store.load(1).unwrap().is_empty());
        assert!(meta.read(1).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_blob_is_a_storage_error() {
        let meta = MemoryMeta::new();
        meta.write(1, "garbage".to_string()).unwrap();
        let store = RuleStore::new(meta);

        assert!(matches!(store.load(1), Err(NotifyError::Storage(_))));
    }
}
