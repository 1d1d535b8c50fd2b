//! JSON-lines operation scripts replayed against a `Deployment`.
//!
//! One step per line: `{"caller": "0xabc", "call": {"op": "accept_terms"}}`.
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::deployment::Deployment;
use crate::error::AccessResult;
use crate::identity::{AssetId, PoolId, Principal};
use crate::pool::PoolSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    UpdateTerms { terms: String },
    AcceptTerms,
    AllowPoolAdmin { principal: Principal },
    RemovePoolAdmin { principal: Principal },
    AllowPoolManager { principal: Principal },
    RemovePoolManager { principal: Principal },
    SetPaused { paused: bool },
    CreatePool {
        liquidity_asset: AssetId,
        #[serde(default)]
        settings: PoolSettings,
    },
    IsPoolAdmin { principal: Principal },
    HasAccepted { principal: Principal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub caller: Principal,
    pub call: Operation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Done,
    Answer { value: bool },
    PoolCreated { pool: PoolId },
}

pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let step: Step = serde_json::from_str(line).with_context(|| format!("script line {}", idx + 1))?;
        out.push(step);
    }
    Ok(out)
}

impl Deployment {
    pub fn apply(&self, step: &Step) -> AccessResult<Outcome> {
        let caller = &step.caller;
        match &step.call {
            Operation::UpdateTerms { terms } => self.tos_registry.update_terms_of_service(caller, terms.as_str()).map(|_| Outcome::Done),
            Operation::AcceptTerms => self.tos_registry.accept_terms_of_service(caller).map(|_| Outcome::Done),
            Operation::AllowPoolAdmin { principal } => self.pool_admins.allow(caller, principal).map(|_| Outcome::Done),
            Operation::RemovePoolAdmin { principal } => self.pool_admins.remove(caller, principal).map(|_| Outcome::Done),
            Operation::AllowPoolManager { principal } => self.pool_managers.allow(caller, principal).map(|_| Outcome::Done),
            Operation::RemovePoolManager { principal } => self.pool_managers.remove(caller, principal).map(|_| Outcome::Done),
            Operation::SetPaused { paused } => self.config.set_paused(caller, *paused).map(|_| Outcome::Done),
            Operation::CreatePool { liquidity_asset, settings } => {
                let pool = self.factory.create_pool(
                    caller,
                    liquidity_asset.clone(),
                    &self.withdraw_controllers,
                    &self.pool_controllers,
                    settings.clone(),
                )?;
                Ok(Outcome::PoolCreated { pool: pool.id() })
            }
            Operation::IsPoolAdmin { principal } => Ok(Outcome::Answer { value: self.pool_admins.is_allowed(principal) }),
            Operation::HasAccepted { principal } => Ok(Outcome::Answer { value: self.tos_registry.has_accepted(principal) }),
        }
    }
}
