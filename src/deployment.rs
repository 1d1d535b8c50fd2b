//! Provisioning of a complete, wired deployment.
//!
//! Order follows the dependency chain: service configuration, ToS registry,
//! pool-admin and pool-manager allow-lists, then the factory. `Deployment`
//! owns the strong references; the configuration only holds weak ones.

use std::sync::Arc;
use tracing::info;

use crate::access::AllowList;
use crate::error::AccessResult;
use crate::events::{EventSink, FileLogger};
use crate::factory::PermissionedPoolFactory;
use crate::identity::Principal;
use crate::pool::{StandardPoolControllerFactory, StandardWithdrawControllerFactory};
use crate::service_config::ServiceConfiguration;
use crate::settings::DeploymentSettings;
use crate::tos::ToSAcceptanceRegistry;
use crate::tprintln;

pub struct Deployment {
    pub config: Arc<ServiceConfiguration>,
    pub tos_registry: Arc<ToSAcceptanceRegistry>,
    pub pool_admins: Arc<AllowList>,
    pub pool_managers: Arc<AllowList>,
    pub factory: Arc<PermissionedPoolFactory>,
    pub withdraw_controllers: StandardWithdrawControllerFactory,
    pub pool_controllers: StandardPoolControllerFactory,
}

impl Deployment {
    pub fn provision(settings: &DeploymentSettings) -> AccessResult<Self> {
        Self::provision_with_sinks(settings, Vec::new())
    }

    /// Like `provision`, with extra sinks registered before any event is emitted.
    pub fn provision_with_sinks(settings: &DeploymentSettings, sinks: Vec<Arc<dyn EventSink>>) -> AccessResult<Self> {
        let operator = &settings.operator;
        let config = ServiceConfiguration::new(operator.clone());
        for sink in sinks {
            config.events().register(sink);
        }
        if let Some(path) = settings.audit_log_path.as_deref() {
            config.events().register(Arc::new(FileLogger::new(path)));
        }

        let tos_registry = ToSAcceptanceRegistry::new(config.clone());
        config.set_tos_acceptance_registry(operator, &tos_registry)?;
        if let Some(terms) = settings.terms_of_service.as_deref() {
            tos_registry.update_terms_of_service(operator, terms)?;
        }

        let pool_admins = AllowList::pool_admin(config.clone());
        config.set_pool_admin_access_control(operator, &pool_admins)?;
        let pool_managers = AllowList::pool_manager(config.clone());

        let factory = PermissionedPoolFactory::new(config.clone());
        if settings.paused {
            config.set_paused(operator, true)?;
        }

        tprintln!("deployment.provision operator={} config_version={}", operator, config.version());
        info!(
            target: "poolgate::deployment",
            "deployment ready: operator={} terms={} paused={} factory={}",
            operator,
            tos_registry.terms_of_service().unwrap_or_else(|| "<unset>".to_string()),
            config.paused(),
            factory.id()
        );

        Ok(Self {
            config,
            tos_registry,
            pool_admins,
            pool_managers,
            factory,
            withdraw_controllers: StandardWithdrawControllerFactory,
            pool_controllers: StandardPoolControllerFactory,
        })
    }

    pub fn operator(&self) -> &Principal { self.config.operator() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_wires_everything() {
        let mut settings = DeploymentSettings::new(Principal::new("0xoperator"));
        settings.terms_of_service = Some("https://terms.example".into());
        let d = Deployment::provision(&settings).unwrap();

        assert_eq!(d.operator(), &Principal::new("0xoperator"));
        assert!(d.config.tos_acceptance_registry().is_ok());
        assert!(d.config.pool_admin_access_control().is_ok());
        assert_eq!(d.tos_registry.terms_of_service().as_deref(), Some("https://terms.example"));
        assert!(!d.config.paused());
        assert_eq!(d.config.version(), 2);
    }

    #[test]
    fn provision_honours_paused() {
        let mut settings = DeploymentSettings::new(Principal::new("0xoperator"));
        settings.paused = true;
        let d = Deployment::provision(&settings).unwrap();
        assert!(d.config.paused());
        assert_eq!(d.tos_registry.terms_of_service(), None);
    }
}
