use clap::Args;
use serde::Serialize;

use tfdeploy::containers;
use tfdeploy::defaults::DEFAULT_ENVIRONMENT;

use super::{CmdResult, TargetArgs};

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct LogsArgs {
    /// Environment whose cluster container to read
    #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct ShellArgs {
    /// Environment whose cluster container to enter
    #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    pub containers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSessionOutput {
    pub container: String,
    pub found: bool,
}

/// Absence of matching containers is a normal outcome, never an error.
pub fn status(args: StatusArgs) -> CmdResult<StatusOutput> {
    let client = args.target.connect()?;
    let containers = containers::list_k3s(&client)?;
    let message = if containers.is_empty() {
        Some("No k3s containers found".to_string())
    } else {
        None
    };
    Ok((StatusOutput { containers, message }, 0))
}

pub fn logs(args: LogsArgs) -> CmdResult<ContainerSessionOutput> {
    let client = args.target.connect()?;
    let container = containers::container_name(&args.env);
    match containers::logs(&client, &args.env)? {
        Some(exit_code) => Ok((
            ContainerSessionOutput {
                container,
                found: true,
            },
            exit_code,
        )),
        None => Ok((
            ContainerSessionOutput {
                container,
                found: false,
            },
            0,
        )),
    }
}

pub fn shell(args: ShellArgs) -> CmdResult<ContainerSessionOutput> {
    let client = args.target.connect()?;
    let container = containers::container_name(&args.env);
    match containers::shell(&client, &args.env)? {
        Some(exit_code) => Ok((
            ContainerSessionOutput {
                container,
                found: true,
            },
            exit_code,
        )),
        None => Ok((
            ContainerSessionOutput {
                container,
                found: false,
            },
            0,
        )),
    }
}
