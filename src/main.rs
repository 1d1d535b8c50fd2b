//!
//! poolgate replay binary
//! ----------------------
//! Provisions a deployment from settings and replays a JSON-lines script of
//! calls against it, logging each outcome.
//!
//! USAGE: poolgate [settings.json] [script.jsonl]
//! Without a settings file, POOLGATE_OPERATOR (and the other POOLGATE_* vars) are used.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use poolgate::script::parse_script;
use poolgate::{Deployment, DeploymentSettings};

fn main() -> Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("poolgate\n\nUSAGE:\n  poolgate [settings.json] [script.jsonl]\n\nENV:\n  POOLGATE_OPERATOR, POOLGATE_TERMS_URL, POOLGATE_PAUSED, POOLGATE_AUDIT_LOG\n");
        return Ok(());
    }

    let settings = DeploymentSettings::resolve(args.first().map(Path::new))?;
    let deployment = Deployment::provision(&settings).context("provisioning deployment")?;

    let Some(script_path) = args.get(1) else {
        info!(target: "poolgate", "no script given; deployment provisioned and idle");
        return Ok(());
    };
    let text = std::fs::read_to_string(script_path).with_context(|| format!("reading script '{}'", script_path))?;
    let steps = parse_script(&text)?;

    let mut failed = 0usize;
    for (n, step) in steps.iter().enumerate() {
        match deployment.apply(step) {
            Ok(outcome) => info!(target: "poolgate", "step {} caller={} -> {}", n + 1, step.caller, serde_json::to_string(&outcome)?),
            Err(e) => {
                failed += 1;
                error!(target: "poolgate", "step {} caller={} failed [{}]: {}", n + 1, step.caller, e.code_str(), e);
            }
        }
    }
    info!(target: "poolgate", "replayed {} steps, {} failed, {} pools created", steps.len(), failed, deployment.factory.pools().len());
    Ok(())
}
