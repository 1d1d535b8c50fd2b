//! Pool creation gated by the pool-admin allow-list, which itself is gated by
//! ToS acceptance. Mirrors a full deployment fixture: configuration, ToS
//! registry with published terms, pool-admin access control and factory.

use anyhow::{Result, bail};
use std::sync::Arc;

use poolgate::events::{Event, EventSink, MemoryRecorder};
use poolgate::pool::{PoolControllerFactory, WithdrawControllerFactory};
use poolgate::{
    AccessError, AssetId, ControllerHandle, Deployment, DeploymentSettings, ErrorKind, PoolId, PoolSettings, Principal,
    tprintln,
};

struct Fixture {
    d: Deployment,
    recorder: Arc<MemoryRecorder>,
    operator: Principal,
    other: Principal,
    asset: AssetId,
}

fn deploy() -> Fixture {
    let operator = Principal::new("0xoperator");
    let mut settings = DeploymentSettings::new(operator.clone());
    settings.terms_of_service = Some("https://terms.example".into());
    let recorder = MemoryRecorder::new();
    let sink: Arc<dyn EventSink> = recorder.clone();
    let d = Deployment::provision_with_sinks(&settings, vec![sink]).expect("provision");
    tprintln!("fixture: factory={} pool_admins={}", d.factory.id(), d.pool_admins.id());
    Fixture { d, recorder, operator, other: Principal::new("0xother"), asset: AssetId::from("0xusdc") }
}

fn create(f: &Fixture, caller: &Principal) -> poolgate::AccessResult<Arc<poolgate::Pool>> {
    f.d.factory.create_pool(caller, f.asset.clone(), &f.d.withdraw_controllers, &f.d.pool_controllers, PoolSettings::default())
}

#[test]
fn accepted_principal_can_be_allowed() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;
    assert!(f.d.pool_admins.is_allowed(&f.other));
    Ok(())
}

#[test]
fn access_control_rejects_principal_without_tos() {
    let f = deploy();
    let err = f.d.pool_admins.allow(&f.operator, &f.other).unwrap_err();
    assert_eq!(err.to_string(), "Pool: no ToS acceptance recorded");
    assert_eq!(err.kind(), ErrorKind::PreconditionNotMet);
    assert!(!f.d.pool_admins.is_allowed(&f.other));
}

#[test]
fn emits_pool_created() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;

    let pool = create(&f, &f.other)?;

    assert_eq!(f.recorder.events_from(f.d.factory.id()), vec![Event::PoolCreated { pool: pool.id() }]);
    assert_eq!(pool.admin(), &f.other);
    assert_eq!(pool.liquidity_asset(), &f.asset);
    assert_eq!(f.d.factory.pools().len(), 1);
    assert!(f.d.factory.pool(&pool.id()).is_some());
    Ok(())
}

#[test]
fn rejects_caller_that_is_not_pool_admin() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;

    // The operator itself was never allowed
    let err = create(&f, &f.operator).err().expect("must fail");
    assert_eq!(err.to_string(), "caller is not allowed pool admin");
    assert!(f.d.factory.pools().is_empty());
    assert!(f.recorder.events_from(f.d.factory.id()).is_empty());
    Ok(())
}

#[test]
fn never_allowed_principal_is_rejected() {
    let f = deploy();
    let z = Principal::new("0xzed");
    assert_eq!(create(&f, &z).err(), Some(AccessError::NotPoolAdmin));
}

#[test]
fn removal_revokes_creation_right() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;
    create(&f, &f.other)?;
    f.d.pool_admins.remove(&f.operator, &f.other)?;
    assert_eq!(create(&f, &f.other).err(), Some(AccessError::NotPoolAdmin));
    // Still accepted, just not allowed
    assert!(f.d.tos_registry.has_accepted(&f.other));
    Ok(())
}

#[test]
fn factory_trusts_allow_list_after_terms_rotation() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;
    f.d.tos_registry.update_terms_of_service(&f.operator, "https://terms.example/v2")?;
    create(&f, &f.other)?;
    Ok(())
}

#[test]
fn paused_protocol_blocks_creation() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;
    f.d.config.set_paused(&f.operator, true)?;

    assert_eq!(create(&f, &f.other).err(), Some(AccessError::Paused));
    f.d.config.set_paused(&f.operator, false)?;
    create(&f, &f.other)?;
    Ok(())
}

struct BrokenWithdrawControllers;

impl WithdrawControllerFactory for BrokenWithdrawControllers {
    fn create(&self, _pool: &PoolId, _settings: &PoolSettings) -> Result<ControllerHandle> {
        bail!("withdraw controller unavailable")
    }
}

#[test]
fn collaborator_failure_leaves_no_pool() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;

    let pool_controllers: &dyn PoolControllerFactory = &f.d.pool_controllers;
    let err = f
        .d
        .factory
        .create_pool(&f.other, f.asset.clone(), &BrokenWithdrawControllers, pool_controllers, PoolSettings::default())
        .err()
        .expect("must fail");
    assert_eq!(err.kind(), ErrorKind::Collaborator);
    assert!(f.d.factory.pools().is_empty());
    assert!(f.recorder.events_from(f.d.factory.id()).is_empty());
    Ok(())
}

#[test]
fn created_pool_has_admin_governed_participants() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;
    let pool = create(&f, &f.other)?;

    let lender = Principal::new("0xlender");
    let participants = pool.access_control();
    assert_eq!(participants.allow(&f.operator, &lender), Err(AccessError::NotAdminOfPool));
    assert_eq!(participants.allow(&f.other, &lender), Err(AccessError::ToSNotAccepted));

    f.d.tos_registry.accept_terms_of_service(&lender)?;
    participants.allow(&f.other, &lender)?;
    assert!(pool.is_participant(&lender));
    assert_eq!(
        f.recorder.events_from(participants.id()),
        vec![Event::AllowListUpdated { principal: lender, allowed: true }]
    );
    Ok(())
}

#[test]
fn factory_resolves_access_control_late() -> Result<()> {
    let f = deploy();
    f.d.tos_registry.accept_terms_of_service(&f.other)?;
    f.d.pool_admins.allow(&f.operator, &f.other)?;

    // Rotate to a fresh, empty pool-admin list
    let replacement = poolgate::AllowList::pool_admin(f.d.config.clone());
    f.d.config.set_pool_admin_access_control(&f.operator, &replacement)?;
    assert_eq!(create(&f, &f.other).err(), Some(AccessError::NotPoolAdmin));

    replacement.allow(&f.operator, &f.other)?;
    create(&f, &f.other)?;
    Ok(())
}
