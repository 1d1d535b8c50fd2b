//! Unified error model for the permissioned pool core.
//! Every failure carries a fixed, human-readable reason string (its `Display`),
//! plus a coarse `ErrorKind` and helper mappers for outer surfaces.

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller lacks the required role.
    Unauthorized,
    /// A dependency of the action (ToS acceptance, published terms, unpaused protocol) is missing.
    PreconditionNotMet,
    /// A collaborator has not been wired into the service configuration.
    Wiring,
    /// An external collaborator failed while building a pool.
    Collaborator,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("caller is not an operator")]
    NotOperator,
    #[error("caller is not allowed pool admin")]
    NotPoolAdmin,
    #[error("caller is not the pool admin")]
    NotAdminOfPool,
    #[error("Pool: no ToS acceptance recorded")]
    ToSNotAccepted,
    #[error("ToS: not set")]
    TermsNotSet,
    #[error("PoolFactory: Protocol paused")]
    Paused,
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("pool construction failed: {0}")]
    Construction(String),
}

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::NotOperator | AccessError::NotPoolAdmin | AccessError::NotAdminOfPool => ErrorKind::Unauthorized,
            AccessError::ToSNotAccepted | AccessError::TermsNotSet | AccessError::Paused => ErrorKind::PreconditionNotMet,
            AccessError::NotConfigured(_) => ErrorKind::Wiring,
            AccessError::Construction(_) => ErrorKind::Collaborator,
        }
    }

    /// Stable snake_case code, independent of the reason wording.
    pub fn code_str(&self) -> &'static str {
        match self {
            AccessError::NotOperator => "not_operator",
            AccessError::NotPoolAdmin => "not_pool_admin",
            AccessError::NotAdminOfPool => "not_admin_of_pool",
            AccessError::ToSNotAccepted => "tos_not_accepted",
            AccessError::TermsNotSet => "terms_not_set",
            AccessError::Paused => "protocol_paused",
            AccessError::NotConfigured(_) => "not_configured",
            AccessError::Construction(_) => "construction_failed",
        }
    }

    pub fn is_unauthorized(&self) -> bool { self.kind() == ErrorKind::Unauthorized }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Unauthorized => 403,
            ErrorKind::PreconditionNotMet => 409,
            ErrorKind::Wiring => 503,
            ErrorKind::Collaborator => 422,
        }
    }
}

pub type AccessResult<T> = Result<T, AccessError>;
