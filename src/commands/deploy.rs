use clap::Args;
use serde::Serialize;

use tfdeploy::defaults::DEFAULT_SCENARIO;
use tfdeploy::deploy::{self, RolloutReport, RolloutStage};

use super::{CmdResult, TargetArgs};

#[derive(Args)]
pub struct DeployAllArgs {
    /// Scenario to roll out across dev, staging, and prod
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: String,

    /// Print the planned command sequence without executing it
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployAllOutput {
    pub scenario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<RolloutStage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<RolloutReport>>,
}

pub fn run(args: DeployAllArgs) -> CmdResult<DeployAllOutput> {
    if args.dry_run {
        return Ok((
            DeployAllOutput {
                scenario: args.scenario.clone(),
                plan: Some(deploy::rollout_plan(&args.scenario)),
                stages: None,
            },
            0,
        ));
    }

    let client = args.target.connect()?;
    let stages = deploy::deploy_all(&client, &args.scenario)?;

    Ok((
        DeployAllOutput {
            scenario: args.scenario,
            plan: None,
            stages: Some(stages),
        },
        0,
    ))
}
