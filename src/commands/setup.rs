use clap::Args;
use serde::Serialize;

use tfdeploy::remote::StepReport;
use tfdeploy::setup::{self, SetupReport};

use super::{CmdResult, TargetArgs};

#[derive(Args)]
pub struct SetupArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct UpdateSubmoduleArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmoduleOutput {
    pub steps: Vec<StepReport>,
}

pub fn run(args: SetupArgs) -> CmdResult<SetupReport> {
    let client = args.target.connect()?;
    Ok((setup::setup(&client)?, 0))
}

pub fn run_update_submodule(args: UpdateSubmoduleArgs) -> CmdResult<UpdateSubmoduleOutput> {
    let client = args.target.connect()?;
    let steps = setup::update_submodule(&client)?;
    Ok((UpdateSubmoduleOutput { steps }, 0))
}
