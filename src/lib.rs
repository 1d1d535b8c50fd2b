pub mod error;
pub mod identity;
pub mod events;
pub mod service_config;
pub mod tos;
pub mod access;
pub mod pool;
pub mod factory;
pub mod settings;
pub mod deployment;
pub mod script;

pub use error::{AccessError, AccessResult, ErrorKind};
pub use identity::{AssetId, ComponentId, ControllerHandle, PoolId, Principal};
pub use service_config::{AccessControl, ServiceConfiguration, TermsGate};
pub use tos::ToSAcceptanceRegistry;
pub use access::{AdmissionRule, AllowList, Authority};
pub use pool::{Pool, PoolBuilder, PoolSettings};
pub use factory::PermissionedPoolFactory;
pub use deployment::Deployment;
pub use settings::DeploymentSettings;

// Debug printing helper: expands to eprintln! in test and debug builds and is a no-op otherwise.
// Usage in tests: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
