//! Allow-list access control.
//!
//! One implementation covers every variant: who may mutate the list is an
//! `Authority`, and what must hold before a principal is added is an
//! `AdmissionRule`.
//!
//! | variant            | authority       | admission                 |
//! |--------------------|-----------------|---------------------------|
//! | pool manager       | operator        | unconditional             |
//! | pool admin         | operator        | requires ToS acceptance   |
//! | pool participants  | the pool admin  | requires ToS acceptance   |
//!
//! `allow` notifies only when membership flips false -> true; `remove`
//! notifies on every successful call.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AccessError, AccessResult};
use crate::events::Event;
use crate::identity::{ComponentId, Principal};
use crate::service_config::{AccessControl, ServiceConfiguration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authority {
    Operator,
    PoolAdmin(Principal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionRule {
    Unconditional,
    RequiresTermsAcceptance,
}

pub struct AllowList {
    id: ComponentId,
    config: Arc<ServiceConfiguration>,
    authority: Authority,
    admission: AdmissionRule,
    members: RwLock<HashSet<Principal>>,
}

impl AllowList {
    pub fn pool_manager(config: Arc<ServiceConfiguration>) -> Arc<Self> {
        Self::with_rules("pool_manager_access_control", config, Authority::Operator, AdmissionRule::Unconditional)
    }

    pub fn pool_admin(config: Arc<ServiceConfiguration>) -> Arc<Self> {
        Self::with_rules("pool_admin_access_control", config, Authority::Operator, AdmissionRule::RequiresTermsAcceptance)
    }

    pub fn pool_participants(config: Arc<ServiceConfiguration>, admin: Principal) -> Arc<Self> {
        Self::with_rules("pool_access_control", config, Authority::PoolAdmin(admin), AdmissionRule::RequiresTermsAcceptance)
    }

    pub fn with_rules(kind: &'static str, config: Arc<ServiceConfiguration>, authority: Authority, admission: AdmissionRule) -> Arc<Self> {
        let id = ComponentId::new(kind);
        debug!(target: "poolgate::access", "{} created: authority={:?} admission={:?}", id, authority, admission);
        Arc::new(Self { id, config, authority, admission, members: RwLock::new(HashSet::new()) })
    }

    pub fn id(&self) -> &ComponentId { &self.id }

    pub fn authority(&self) -> &Authority { &self.authority }

    pub fn admission(&self) -> AdmissionRule { self.admission }

    pub fn is_allowed(&self, principal: &Principal) -> bool {
        self.members.read().contains(principal)
    }

    /// Sorted snapshot of current members.
    pub fn members(&self) -> Vec<Principal> {
        let mut out: Vec<Principal> = self.members.read().iter().cloned().collect();
        out.sort();
        out
    }

    fn ensure_authority(&self, caller: &Principal, op: &str) -> AccessResult<()> {
        match &self.authority {
            Authority::Operator => self.config.ensure_operator(caller, op),
            Authority::PoolAdmin(admin) if admin == caller => Ok(()),
            Authority::PoolAdmin(_) => {
                warn!(target: "poolgate::access", "{} on {} rejected: caller={} is not the pool admin", op, self.id, caller);
                Err(AccessError::NotAdminOfPool)
            }
        }
    }

    fn ensure_admission(&self, principal: &Principal) -> AccessResult<()> {
        match self.admission {
            AdmissionRule::Unconditional => Ok(()),
            AdmissionRule::RequiresTermsAcceptance => {
                let registry = self.config.tos_acceptance_registry()?;
                if registry.has_accepted(principal) { return Ok(()); }
                warn!(target: "poolgate::access", "allow {} on {} rejected: no ToS acceptance", principal, self.id);
                Err(AccessError::ToSNotAccepted)
            }
        }
    }

    pub fn allow(&self, caller: &Principal, principal: &Principal) -> AccessResult<()> {
        let _call = self.config.begin_call();
        self.ensure_authority(caller, "allow")?;
        // Re-validated even for existing members
        self.ensure_admission(principal)?;
        let added = self.members.write().insert(principal.clone());
        if !added {
            debug!(target: "poolgate::access", "allow {} on {}: already a member", principal, self.id);
            return Ok(());
        }
        info!(target: "poolgate::access", "{} added to {}", principal, self.id);
        self.config.events().emit(&self.id, Event::AllowListUpdated { principal: principal.clone(), allowed: true });
        Ok(())
    }

    pub fn remove(&self, caller: &Principal, principal: &Principal) -> AccessResult<()> {
        let _call = self.config.begin_call();
        self.ensure_authority(caller, "remove")?;
        self.members.write().remove(principal);
        info!(target: "poolgate::access", "{} removed from {}", principal, self.id);
        self.config.events().emit(&self.id, Event::AllowListUpdated { principal: principal.clone(), allowed: false });
        Ok(())
    }
}

impl AccessControl for AllowList {
    fn is_allowed(&self, principal: &Principal) -> bool { AllowList::is_allowed(self, principal) }
}
