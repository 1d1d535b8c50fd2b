//! Terms-of-service acceptance registry.
//!
//! Acceptance is a single flag per principal and is not keyed by terms version:
//! publishing new terms leaves existing acceptances in place.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AccessError, AccessResult};
use crate::events::Event;
use crate::identity::{ComponentId, Principal};
use crate::service_config::{ServiceConfiguration, TermsGate};

#[derive(Default)]
struct TermsState {
    terms: Option<String>,
    accepted: HashMap<Principal, bool>,
}

pub struct ToSAcceptanceRegistry {
    id: ComponentId,
    config: Arc<ServiceConfiguration>,
    state: RwLock<TermsState>,
}

impl ToSAcceptanceRegistry {
    pub fn new(config: Arc<ServiceConfiguration>) -> Arc<Self> {
        Arc::new(Self { id: ComponentId::new("tos_acceptance_registry"), config, state: RwLock::new(TermsState::default()) })
    }

    pub fn id(&self) -> &ComponentId { &self.id }

    /// Publish new terms. Operator only.
    pub fn update_terms_of_service<S: Into<String>>(&self, caller: &Principal, terms: S) -> AccessResult<()> {
        let _call = self.config.begin_call();
        self.config.ensure_operator(caller, "update_terms_of_service")?;
        let terms = terms.into();
        self.state.write().terms = Some(terms.clone());
        info!(target: "poolgate::tos", "terms of service updated: '{}'", terms);
        self.config.events().emit(&self.id, Event::TermsOfServiceUpdated { terms });
        Ok(())
    }

    /// Record acceptance for the caller itself. Fails until terms have been published.
    pub fn accept_terms_of_service(&self, caller: &Principal) -> AccessResult<()> {
        let _call = self.config.begin_call();
        {
            let mut st = self.state.write();
            if st.terms.as_deref().map_or(true, str::is_empty) {
                warn!(target: "poolgate::tos", "acceptance by {} rejected: no terms published", caller);
                return Err(AccessError::TermsNotSet);
            }
            st.accepted.insert(caller.clone(), true);
        }
        info!(target: "poolgate::tos", "{} accepted the terms of service", caller);
        self.config.events().emit(&self.id, Event::AcceptedTermsOfService { principal: caller.clone() });
        Ok(())
    }

    pub fn has_accepted(&self, principal: &Principal) -> bool {
        self.state.read().accepted.get(principal).copied().unwrap_or(false)
    }

    pub fn terms_of_service(&self) -> Option<String> { self.state.read().terms.clone() }
}

impl TermsGate for ToSAcceptanceRegistry {
    fn has_accepted(&self, principal: &Principal) -> bool { ToSAcceptanceRegistry::has_accepted(self, principal) }
}
