use clap::Args;

use tfdeploy::defaults::{DEFAULT_ENVIRONMENT, DEFAULT_SCENARIO};
use tfdeploy::terraform::{self as tf, TaskReport};

use super::{CmdResult, TargetArgs};

#[derive(Args)]
pub struct InitArgs {
    /// Scenario subdirectory under the Terraform root
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Scenario subdirectory under the Terraform root
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: String,

    /// Workspace to plan against (created if absent)
    #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Scenario subdirectory under the Terraform root
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: String,

    /// Workspace to apply (must already exist)
    #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    /// Skip Terraform's confirmation prompt
    #[arg(long)]
    pub auto_approve: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct DestroyArgs {
    /// Scenario subdirectory under the Terraform root
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: String,

    /// Workspace to destroy
    #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Scenario subdirectory under the Terraform root
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct TestArgs {
    /// Scenario whose connectivity scripts should run
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Apply without --auto-approve attaches the TTY for Terraform's
/// confirmation prompt; destroy always does.
pub fn is_interactive_apply(args: &ApplyArgs) -> bool {
    !args.auto_approve
}

pub fn init(args: InitArgs) -> CmdResult<TaskReport> {
    let client = args.target.connect()?;
    Ok((tf::init(&client, &args.scenario)?, 0))
}

pub fn plan(args: PlanArgs) -> CmdResult<TaskReport> {
    let client = args.target.connect()?;
    Ok((tf::plan(&client, &args.scenario, &args.env)?, 0))
}

pub fn apply(args: ApplyArgs) -> CmdResult<TaskReport> {
    let client = args.target.connect()?;
    Ok((
        tf::apply(&client, &args.scenario, &args.env, args.auto_approve)?,
        0,
    ))
}

pub fn destroy(args: DestroyArgs) -> CmdResult<TaskReport> {
    let client = args.target.connect()?;
    Ok((tf::destroy(&client, &args.scenario, &args.env)?, 0))
}

pub fn validate(args: ValidateArgs) -> CmdResult<TaskReport> {
    let client = args.target.connect()?;
    Ok((tf::validate(&client, &args.scenario)?, 0))
}

pub fn test(args: TestArgs) -> CmdResult<TaskReport> {
    let client = args.target.connect()?;
    Ok((tf::connectivity_test(&client, &args.scenario)?, 0))
}
