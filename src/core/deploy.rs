//! Sequential multi-environment rollout.
//!
//! `deploy_all` walks the fixed environment order and runs init + apply for
//! each. It is deliberately NOT atomic across environments: a failure on
//! staging leaves dev deployed, with no rollback and no confirmation gate
//! before prod. That matches the upstream workflow this tool wraps; see
//! DESIGN.md before changing it.

use serde::Serialize;

use crate::defaults::ROLLOUT_ORDER;
use crate::error::Result;
use crate::ssh::SshClient;
use crate::terraform::{self, TaskReport};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutStage {
    pub environment: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutReport {
    pub environment: String,
    pub init: TaskReport,
    pub apply: TaskReport,
}

/// The rendered command sequence `deploy_all` would run, one stage per
/// environment in rollout order. Apply is always auto-approved here.
pub fn rollout_plan(scenario: &str) -> Vec<RolloutStage> {
    ROLLOUT_ORDER
        .iter()
        .map(|&environment| {
            let mut commands = terraform::init_commands(scenario);
            commands.extend(terraform::apply_commands(scenario, environment, true));
            RolloutStage {
                environment: environment.to_string(),
                commands: commands.iter().map(|c| c.render()).collect(),
            }
        })
        .collect()
}

pub fn deploy_all(client: &SshClient, scenario: &str) -> Result<Vec<RolloutReport>> {
    let mut completed = Vec::new();

    for environment in ROLLOUT_ORDER {
        log_status!("deploy", "{}", "=".repeat(50));
        log_status!("deploy", "Deploying to {} environment...", environment);
        log_status!("deploy", "{}", "=".repeat(50));

        // No rollback: a failure here leaves earlier environments deployed.
        let init = terraform::init(client, scenario)?;
        let apply = terraform::apply(client, scenario, environment, true)?;

        completed.push(RolloutReport {
            environment: environment.to_string(),
            init,
            apply,
        });
    }

    Ok(completed)
}
