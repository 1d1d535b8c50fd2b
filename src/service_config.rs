//! Service configuration: the single source of truth for the operator identity
//! and for the collaborators every other component resolves at call time.
//!
//! Collaborators are held as `Weak` references. Each component keeps an `Arc`
//! to the configuration for its whole lifetime, so strong references in the
//! other direction would form a cycle; the owner of the deployment keeps the
//! components alive instead. A collaborator that is unwired or already dropped
//! resolves to `AccessError::NotConfigured`.
//!
//! Every mutating call across the crate first takes `begin_call()`, which
//! serializes state changes and their notifications globally. The guard is
//! reentrant, and no component holds its own state lock while emitting, so a
//! sink may react to a notification with another call on the same thread.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

use crate::error::{AccessError, AccessResult};
use crate::events::{Event, EventBus};
use crate::identity::{ComponentId, Principal};

/// Capability check consumed by the factory. Must be free of side effects.
pub trait AccessControl: Send + Sync {
    fn is_allowed(&self, principal: &Principal) -> bool;
}

/// Terms-of-service gate consumed by allow-lists with an acceptance precondition.
pub trait TermsGate: Send + Sync {
    fn has_accepted(&self, principal: &Principal) -> bool;
}

#[derive(Default)]
struct Wiring {
    pool_admin_access_control: Option<Weak<dyn AccessControl>>,
    tos_acceptance_registry: Option<Weak<dyn TermsGate>>,
    paused: bool,
    version: u64,
}

pub struct ServiceConfiguration {
    id: ComponentId,
    operator: Principal,
    wiring: RwLock<Wiring>,
    serial: ReentrantMutex<()>,
    events: EventBus,
}

impl ServiceConfiguration {
    /// Create the configuration with the deploying principal as operator.
    pub fn new(operator: Principal) -> Arc<Self> {
        let id = ComponentId::new("service_configuration");
        info!(target: "poolgate::config", "service configuration {} created, operator={}", id, operator);
        Arc::new(Self { id, operator, wiring: RwLock::new(Wiring::default()), serial: ReentrantMutex::new(()), events: EventBus::default() })
    }

    pub fn id(&self) -> &ComponentId { &self.id }

    pub fn operator(&self) -> &Principal { &self.operator }

    pub fn is_operator(&self, principal: &Principal) -> bool { &self.operator == principal }

    pub fn events(&self) -> &EventBus { &self.events }

    /// Serialization guard held for the full duration of a mutating call.
    /// Reentrant: an event sink may issue further calls from the emitting thread.
    pub(crate) fn begin_call(&self) -> ReentrantMutexGuard<'_, ()> { self.serial.lock() }

    pub(crate) fn ensure_operator(&self, caller: &Principal, op: &str) -> AccessResult<()> {
        if self.is_operator(caller) { return Ok(()); }
        warn!(target: "poolgate::config", "{} rejected: caller={} is not the operator", op, caller);
        Err(AccessError::NotOperator)
    }

    pub fn set_pool_admin_access_control<A: AccessControl + 'static>(&self, caller: &Principal, access_control: &Arc<A>) -> AccessResult<()> {
        let _call = self.begin_call();
        self.ensure_operator(caller, "set_pool_admin_access_control")?;
        let weak: Weak<A> = Arc::downgrade(access_control);
        let weak: Weak<dyn AccessControl> = weak;
        let mut w = self.wiring.write();
        w.pool_admin_access_control = Some(weak);
        w.version += 1;
        info!(target: "poolgate::config", "pool admin access control wired (config version {})", w.version);
        Ok(())
    }

    pub fn set_tos_acceptance_registry<T: TermsGate + 'static>(&self, caller: &Principal, registry: &Arc<T>) -> AccessResult<()> {
        let _call = self.begin_call();
        self.ensure_operator(caller, "set_tos_acceptance_registry")?;
        let weak: Weak<T> = Arc::downgrade(registry);
        let weak: Weak<dyn TermsGate> = weak;
        let mut w = self.wiring.write();
        w.tos_acceptance_registry = Some(weak);
        w.version += 1;
        info!(target: "poolgate::config", "ToS acceptance registry wired (config version {})", w.version);
        Ok(())
    }

    pub fn set_paused(&self, caller: &Principal, paused: bool) -> AccessResult<()> {
        let _call = self.begin_call();
        self.ensure_operator(caller, "set_paused")?;
        {
            let mut w = self.wiring.write();
            w.paused = paused;
            w.version += 1;
        }
        info!(target: "poolgate::config", "protocol paused={}", paused);
        self.events.emit(&self.id, Event::PausedUpdated { paused });
        Ok(())
    }

    pub fn paused(&self) -> bool { self.wiring.read().paused }

    pub fn version(&self) -> u64 { self.wiring.read().version }

    pub fn pool_admin_access_control(&self) -> AccessResult<Arc<dyn AccessControl>> {
        let resolved = self.wiring.read().pool_admin_access_control.as_ref().and_then(Weak::upgrade);
        debug!(target: "poolgate::config", "resolve pool admin access control -> {}", resolved.is_some());
        resolved.ok_or(AccessError::NotConfigured("pool admin access control"))
    }

    pub fn tos_acceptance_registry(&self) -> AccessResult<Arc<dyn TermsGate>> {
        let resolved = self.wiring.read().tos_acceptance_registry.as_ref().and_then(Weak::upgrade);
        debug!(target: "poolgate::config", "resolve ToS acceptance registry -> {}", resolved.is_some());
        resolved.ok_or(AccessError::NotConfigured("ToS acceptance registry"))
    }
}
