//! Pool aggregate, its settings, and the builder that wires it to the external
//! withdraw-controller and pool-controller collaborators.
//!
//! The builder either returns a fully wired `Pool` or an error; no partially
//! constructed aggregate ever leaves `build()`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::access::AllowList;
use crate::error::{AccessError, AccessResult};
use crate::identity::{AssetId, ControllerHandle, PoolId, Principal};
use crate::service_config::ServiceConfiguration;

/// Pool parameters handed to the collaborators. Validation is their concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub max_capacity: u64,
    /// Unix seconds
    pub end_date: i64,
    pub request_fee_bps: u16,
    pub request_cancellation_fee_bps: u16,
    pub withdraw_gate_bps: u16,
    pub service_fee_bps: u16,
    pub first_loss_initial_minimum: u64,
    /// Seconds
    pub withdraw_request_period_duration: u64,
    pub fixed_fee: u64,
    pub fixed_fee_interval: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_capacity: 10_000_000_000_000,
            end_date: 1_893_456_000, // 2030-01-01
            request_fee_bps: 500,
            request_cancellation_fee_bps: 100,
            withdraw_gate_bps: 10_000,
            service_fee_bps: 0,
            first_loss_initial_minimum: 100_000_000_000,
            withdraw_request_period_duration: 30 * 86_400,
            fixed_fee: 0,
            fixed_fee_interval: 0,
        }
    }
}

pub trait WithdrawControllerFactory: Send + Sync {
    fn create(&self, pool: &PoolId, settings: &PoolSettings) -> Result<ControllerHandle>;
}

pub trait PoolControllerFactory: Send + Sync {
    fn create(&self, pool: &PoolId, admin: &Principal, asset: &AssetId, settings: &PoolSettings) -> Result<ControllerHandle>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardWithdrawControllerFactory;

impl WithdrawControllerFactory for StandardWithdrawControllerFactory {
    fn create(&self, pool: &PoolId, _settings: &PoolSettings) -> Result<ControllerHandle> {
        let handle = ControllerHandle::new("withdraw_controller");
        debug!(target: "poolgate::factory", "withdraw controller {} minted for {}", handle.id, pool);
        Ok(handle)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPoolControllerFactory;

impl PoolControllerFactory for StandardPoolControllerFactory {
    fn create(&self, pool: &PoolId, admin: &Principal, _asset: &AssetId, _settings: &PoolSettings) -> Result<ControllerHandle> {
        let handle = ControllerHandle::new("pool_controller");
        debug!(target: "poolgate::factory", "pool controller {} minted for {} (admin {})", handle.id, pool, admin);
        Ok(handle)
    }
}

pub struct Pool {
    id: PoolId,
    admin: Principal,
    liquidity_asset: AssetId,
    settings: PoolSettings,
    withdraw_controller: ControllerHandle,
    pool_controller: ControllerHandle,
    participants: Arc<AllowList>,
    created_at: DateTime<Utc>,
}

impl Pool {
    pub fn id(&self) -> PoolId { self.id }
    pub fn admin(&self) -> &Principal { &self.admin }
    pub fn liquidity_asset(&self) -> &AssetId { &self.liquidity_asset }
    pub fn settings(&self) -> &PoolSettings { &self.settings }
    pub fn withdraw_controller(&self) -> &ControllerHandle { &self.withdraw_controller }
    pub fn pool_controller(&self) -> &ControllerHandle { &self.pool_controller }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    /// Participant allow-list governed by this pool's admin.
    pub fn access_control(&self) -> &Arc<AllowList> { &self.participants }

    pub fn is_participant(&self, principal: &Principal) -> bool { self.participants.is_allowed(principal) }
}

pub struct PoolBuilder<'a> {
    config: Arc<ServiceConfiguration>,
    admin: Option<Principal>,
    liquidity_asset: Option<AssetId>,
    settings: Option<PoolSettings>,
    withdraw_controllers: Option<&'a dyn WithdrawControllerFactory>,
    pool_controllers: Option<&'a dyn PoolControllerFactory>,
}

impl<'a> PoolBuilder<'a> {
    pub fn new(config: Arc<ServiceConfiguration>) -> Self {
        Self { config, admin: None, liquidity_asset: None, settings: None, withdraw_controllers: None, pool_controllers: None }
    }

    pub fn admin(mut self, admin: Principal) -> Self { self.admin = Some(admin); self }
    pub fn liquidity_asset(mut self, asset: AssetId) -> Self { self.liquidity_asset = Some(asset); self }
    pub fn settings(mut self, settings: PoolSettings) -> Self { self.settings = Some(settings); self }
    pub fn withdraw_controllers(mut self, f: &'a dyn WithdrawControllerFactory) -> Self { self.withdraw_controllers = Some(f); self }
    pub fn pool_controllers(mut self, f: &'a dyn PoolControllerFactory) -> Self { self.pool_controllers = Some(f); self }

    pub fn build(self) -> AccessResult<Pool> {
        let missing = |what: &str| AccessError::Construction(format!("missing {}", what));
        let admin = self.admin.ok_or_else(|| missing("pool admin"))?;
        let liquidity_asset = self.liquidity_asset.ok_or_else(|| missing("liquidity asset"))?;
        let settings = self.settings.ok_or_else(|| missing("pool settings"))?;
        let withdraw_controllers = self.withdraw_controllers.ok_or_else(|| missing("withdraw controller factory"))?;
        let pool_controllers = self.pool_controllers.ok_or_else(|| missing("pool controller factory"))?;

        let id = PoolId::new();
        let withdraw_controller = withdraw_controllers
            .create(&id, &settings)
            .map_err(|e| AccessError::Construction(format!("withdraw controller: {:#}", e)))?;
        let pool_controller = pool_controllers
            .create(&id, &admin, &liquidity_asset, &settings)
            .map_err(|e| AccessError::Construction(format!("pool controller: {:#}", e)))?;
        let participants = AllowList::pool_participants(self.config, admin.clone());

        Ok(Pool { id, admin, liquidity_asset, settings, withdraw_controller, pool_controller, participants, created_at: Utc::now() })
    }
}
