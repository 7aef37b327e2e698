// SPDX-License-Identifier: MIT

//! Entry point the host calls before sending its default auto-responder

use super::evaluator::{decide, Decision};
use super::store::{RuleSet, RuleStore};
use crate::host::{Form, MetaStore, NotificationGateway, Record};

/// Conditional notifications wired to one host.
///
/// Construct one per host lifetime and hand it to the host's submission
/// pipeline.
pub struct ConditionalNotifications<M, G> {
    store: RuleStore<M>,
    gateway: G,
}

impl<M: MetaStore, G: NotificationGateway> ConditionalNotifications<M, G> {
    pub fn new(store: RuleStore<M>, gateway: G) -> Self {
        Self { store, gateway }
    }

    /// Decide the fate of the default notification for `record`, sending the
    /// overriding message if one applies.
    ///
    /// Never fails; anything unexpected falls back to `Decision::Defer`.
    pub fn on_before_notify(&self, form: &Form, record: &Record) -> Decision {
        let rules = match self.store.load(form.id) {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!(
                    "Form {}: could not load conditions ({}), using default notification",
                    form.id,
                    e
                );
                RuleSet::empty(form.id)
            }
        };

        let decision = decide(form, &rules, record);
        match &decision {
            Decision::Defer => log::debug!("Form {}: no condition applies", form.id),
            Decision::Suppress => log::info!("Form {}: notification suppressed", form.id),
            Decision::Override(message) => {
                log::info!("Form {}: sending conditional notification", form.id);
                // The default stays disabled even if this send fails
                if let Err(e) = self.gateway.send(form, record, message) {
                    log::error!(
                        "Form {}: conditional notification failed: {}",
                        form.id,
                        e
                    );
                }
            }
        }
        decision
    }

    /// Filter-shaped variant: returns whether the default notification is disabled
    pub fn disable_default(&self, disable: bool, form: &Form, record: &Record) -> bool {
        match self.on_before_notify(form, record) {
            Decision::Defer => disable,
            _ => true,
        }
    }
}
