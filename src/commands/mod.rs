use clap::Args;

use tfdeploy::ssh::SshClient;
use tfdeploy::target;

pub type CmdResult<T> = tfdeploy::Result<(T, i32)>;

/// Connection flags shared by every command. Resolution precedence per field
/// is explicit flag, then environment variable, then the built-in
/// placeholder, which is always rejected.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Remote host (defaults to $TFDEPLOY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// SSH user (defaults to $TFDEPLOY_USER)
    #[arg(long)]
    pub user: Option<String>,
}

impl TargetArgs {
    pub fn connect(&self) -> tfdeploy::Result<SshClient> {
        let target = target::resolve(self.host.as_deref(), self.user.as_deref())?;
        Ok(SshClient::connect(&target))
    }
}

pub mod containers;
pub mod deploy;
pub mod setup;
pub mod terraform;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident::$func:ident) => {
        crate::output::map_cmd_result_to_json($module::$func($args))
    };
}

pub(crate) fn run_json(command: crate::Commands) -> (tfdeploy::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Init(args) => dispatch!(args, terraform::init),
        crate::Commands::Plan(args) => dispatch!(args, terraform::plan),
        crate::Commands::Apply(args) => dispatch!(args, terraform::apply),
        crate::Commands::Destroy(args) => dispatch!(args, terraform::destroy),
        crate::Commands::Validate(args) => dispatch!(args, terraform::validate),
        crate::Commands::Test(args) => dispatch!(args, terraform::test),

        crate::Commands::DeployAll(args) => dispatch!(args, deploy::run),
        crate::Commands::Setup(args) => dispatch!(args, setup::run),
        crate::Commands::UpdateSubmodule(args) => dispatch!(args, setup::run_update_submodule),

        crate::Commands::Status(args) => dispatch!(args, containers::status),
        crate::Commands::Logs(args) => dispatch!(args, containers::logs),
        crate::Commands::Shell(args) => dispatch!(args, containers::shell),
    }
}
