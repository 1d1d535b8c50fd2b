//! Permissioned pool factory: the public entry point for pool creation.
//! The pool-admin allow-list is the single authorization boundary here; ToS
//! acceptance was already enforced when the caller was added to it.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AccessError, AccessResult};
use crate::events::Event;
use crate::identity::{AssetId, ComponentId, PoolId, Principal};
use crate::pool::{Pool, PoolBuilder, PoolControllerFactory, PoolSettings, WithdrawControllerFactory};
use crate::service_config::ServiceConfiguration;

pub struct PermissionedPoolFactory {
    id: ComponentId,
    config: Arc<ServiceConfiguration>,
    pools: RwLock<Vec<Arc<Pool>>>,
}

impl PermissionedPoolFactory {
    pub fn new(config: Arc<ServiceConfiguration>) -> Arc<Self> {
        Arc::new(Self { id: ComponentId::new("permissioned_pool_factory"), config, pools: RwLock::new(Vec::new()) })
    }

    pub fn id(&self) -> &ComponentId { &self.id }

    /// Pure capability check against the currently wired pool-admin access control.
    pub fn is_pool_admin(&self, principal: &Principal) -> AccessResult<bool> {
        Ok(self.config.pool_admin_access_control()?.is_allowed(principal))
    }

    pub fn create_pool(
        &self,
        caller: &Principal,
        liquidity_asset: AssetId,
        withdraw_controllers: &dyn WithdrawControllerFactory,
        pool_controllers: &dyn PoolControllerFactory,
        settings: PoolSettings,
    ) -> AccessResult<Arc<Pool>> {
        let _call = self.config.begin_call();
        if !self.is_pool_admin(caller)? {
            warn!(target: "poolgate::factory", "create_pool rejected: caller={} is not an allowed pool admin", caller);
            return Err(AccessError::NotPoolAdmin);
        }
        if self.config.paused() {
            warn!(target: "poolgate::factory", "create_pool rejected: protocol paused (caller={})", caller);
            return Err(AccessError::Paused);
        }
        let pool = PoolBuilder::new(self.config.clone())
            .admin(caller.clone())
            .liquidity_asset(liquidity_asset)
            .settings(settings)
            .withdraw_controllers(withdraw_controllers)
            .pool_controllers(pool_controllers)
            .build()?;
        let pool = Arc::new(pool);
        self.pools.write().push(pool.clone());
        info!(target: "poolgate::factory", "{} created by {} for asset {}", pool.id(), caller, pool.liquidity_asset());
        self.config.events().emit(&self.id, Event::PoolCreated { pool: pool.id() });
        Ok(pool)
    }

    pub fn pools(&self) -> Vec<Arc<Pool>> { self.pools.read().clone() }

    pub fn pool(&self, id: &PoolId) -> Option<Arc<Pool>> {
        self.pools.read().iter().find(|p| &p.id() == id).cloned()
    }
}
