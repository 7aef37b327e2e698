// SPDX-License-Identifier: MIT

//! Ordered, keyed collection of rules for one form

use indexmap::IndexMap;

use crate::conditions::rule::{Rule, RuleKey};
use crate::host::FormId;

/// The full set of rules for one form, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    form: FormId,
    rules: IndexMap<RuleKey, Rule>,
}

impl RuleSet {
    /// Create an empty RuleSet
    pub fn empty(form: FormId) -> Self {
        Self {
            form,
            rules: IndexMap::new(),
        }
    }

    /// Build a set from rules in order.
    ///
    /// Rules sharing a key collapse: the later rule replaces the earlier one
    /// and keeps the earlier one's position.
    pub fn from_rules(form: FormId, rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut set = Self::empty(form);
        for rule in rules {
            set = set.with(rule);
        }
        set
    }

    /// Returns a set with `rule` added under its key
    pub fn with(mut self, rule: Rule) -> Self {
        let key = rule.key();
        if let Some(previous) = self.rules.insert(key.clone(), rule) {
            log::warn!(
                "Form {}: condition {} (field {} = '{}') replaced by a later one",
                self.form,
                key,
                previous.field(),
                previous.value()
            );
        }
        self
    }

    pub fn form(&self) -> FormId {
        self.form
    }

    pub fn get(&self, key: &RuleKey) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RuleKey> {
        self.rules.keys()
    }

    /// Rules in stored order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&RuleKey, &Rule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = indexmap::map::Values<'a, RuleKey, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::rule::MessageOverride;

    #[test]
    fn test_empty_set() {
        let set = RuleSet::empty(4);
        assert!(set.is_empty());
        assert_eq!(set.form(), 4);
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let set = RuleSet::from_rules(
            1,
            vec![
                Rule::suppress(3, "b"),
                Rule::suppress(1, "a"),
                Rule::suppress(2, "c"),
            ],
        );
        let values: Vec<_> = set.iter().map(|r| r.value()).collect();
        assert_eq!(values, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_collision_last_write_wins() {
        let message = MessageOverride {
            subject: "Later".to_string(),
            ..Default::default()
        };
        let set = RuleSet::from_rules(
            1,
            vec![
                Rule::suppress(1, "yes"),
                Rule::suppress(1, "no"),
                Rule::send(1, "yes", message.clone()),
            ],
        );

        assert_eq!(set.len(), 2);
        let first = set.iter().next().unwrap();
        assert_eq!(first.value(), "yes");
        assert_eq!(first, &Rule::send(1, "yes", message));
    }

    #[test]
    fn test_lookup_by_key() {
        let rule = Rule::suppress(5, "x");
        let set = RuleSet::from_rules(1, vec![rule.clone()]);
        assert_eq!(set.get(&rule.key()), Some(&rule));
        assert!(set.get(&Rule::suppress(5, "y").key()).is_none());
    }
}
