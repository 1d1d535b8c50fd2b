//! Deployment settings: a JSON file overlaid with `POOLGATE_*` environment variables.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::identity::Principal;

pub const ENV_OPERATOR: &str = "POOLGATE_OPERATOR";
pub const ENV_TERMS_URL: &str = "POOLGATE_TERMS_URL";
pub const ENV_PAUSED: &str = "POOLGATE_PAUSED";
pub const ENV_AUDIT_LOG: &str = "POOLGATE_AUDIT_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    /// Principal installed as operator of the service configuration.
    pub operator: Principal,
    /// Terms published right after the ToS registry is wired.
    #[serde(default)]
    pub terms_of_service: Option<String>,
    #[serde(default)]
    pub paused: bool,
    /// JSON-lines audit file receiving every emitted event.
    #[serde(default)]
    pub audit_log_path: Option<String>,
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl DeploymentSettings {
    pub fn new(operator: Principal) -> Self {
        Self { operator, terms_of_service: None, paused: false, audit_log_path: None }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("reading settings '{}'", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing settings '{}'", path.display()))
    }

    /// Settings file when given, otherwise environment only; env values win either way.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::load(p)?,
            None => match std::env::var(ENV_OPERATOR) {
                Ok(op) if !op.is_empty() => Self::new(Principal::new(op)),
                _ => bail!("no settings file given and {} is not set", ENV_OPERATOR),
            },
        };
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Overlay values from an arbitrary lookup (the process environment in production).
    pub fn apply_overrides_from<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) -> Result<()> {
        if let Some(op) = lookup(ENV_OPERATOR).filter(|s| !s.is_empty()) {
            self.operator = Principal::new(op);
        }
        if let Some(terms) = lookup(ENV_TERMS_URL) {
            self.terms_of_service = Some(terms);
        }
        if let Some(raw) = lookup(ENV_PAUSED) {
            match parse_bool(&raw) {
                Some(v) => self.paused = v,
                None => bail!("{}='{}' is not a boolean", ENV_PAUSED, raw),
            }
        }
        if let Some(p) = lookup(ENV_AUDIT_LOG).filter(|s| !s.is_empty()) {
            self.audit_log_path = Some(p);
        }
        Ok(())
    }
}
