//! Identities that flow through authorization decisions: principals and the
//! handles of components, pools, assets and controllers.

mod principal;
mod handles;

pub use principal::Principal;
pub use handles::{AssetId, ComponentId, ControllerHandle, PoolId};
