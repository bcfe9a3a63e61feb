use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tty;

use commands::{containers, deploy, setup, terraform};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tfdeploy")]
#[command(version = VERSION)]
#[command(about = "CLI for remote Terraform scenario deployment over SSH")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Terraform for a scenario
    Init(terraform::InitArgs),
    /// Plan Terraform changes for an environment
    Plan(terraform::PlanArgs),
    /// Apply Terraform changes for an environment
    Apply(terraform::ApplyArgs),
    /// Destroy an environment's infrastructure
    Destroy(terraform::DestroyArgs),
    /// Validate and format-check a scenario
    Validate(terraform::ValidateArgs),
    /// Run connectivity tests for a scenario
    Test(terraform::TestArgs),
    /// Deploy a scenario to dev, staging, and prod sequentially
    DeployAll(deploy::DeployAllArgs),
    /// Bootstrap the remote host: tool checks and infra checkout
    Setup(setup::SetupArgs),
    /// Update the terraform submodule to its latest remote commit
    UpdateSubmodule(setup::UpdateSubmoduleArgs),
    /// List k3s containers on the remote host
    Status(containers::StatusArgs),
    /// Stream the k3s journal from an environment's container
    Logs(containers::LogsArgs),
    /// Open a shell inside an environment's container
    Shell(containers::ShellArgs),
}

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    InteractivePassthrough,
}

/// Commands that attach the TTY to a remote process: container sessions,
/// journal streaming, and Terraform confirmation prompts.
fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Logs(_) | Commands::Shell(_) | Commands::Destroy(_) => {
            ResponseMode::InteractivePassthrough
        }
        Commands::Apply(args) if terraform::is_interactive_apply(args) => {
            ResponseMode::InteractivePassthrough
        }
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = response_mode(&cli.command);

    if let ResponseMode::InteractivePassthrough = mode {
        if !tty::require_tty_for_interactive() {
            let err = tfdeploy::Error::validation_invalid_argument(
                "tty",
                "This command requires an interactive TTY",
            );
            output::print_error(&err);
            return std::process::ExitCode::from(2);
        }
    }

    let (json_result, exit_code) = commands::run_json(cli.command);

    match mode {
        ResponseMode::Json => output::print_json_result(json_result),
        ResponseMode::InteractivePassthrough => {
            // The remote process owned the terminal; only surface failures.
            if let Err(err) = &json_result {
                output::print_error(err);
            }
        }
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
