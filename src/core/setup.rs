//! Remote host bootstrap: tool preflight, infra checkout, submodules.

use serde::Serialize;

use crate::defaults::{INFRA_REPO_URL, REMOTE_ROOT};
use crate::error::{Error, Result};
use crate::remote::{run_steps, RemoteCommand, StepReport};
use crate::ssh::SshClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightCheck {
    pub tool: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    pub preflight: Vec<PreflightCheck>,
    pub steps: Vec<StepReport>,
}

/// Tools that must be present on the target host before anything else runs.
pub fn preflight_commands() -> Vec<(&'static str, RemoteCommand)> {
    vec![
        ("terraform", RemoteCommand::new("terraform").arg("--version")),
        ("lxd", RemoteCommand::new("lxd").arg("--version")),
    ]
}

fn clone_or_pull() -> RemoteCommand {
    // Fixed constant script; no caller-supplied values are interpolated here.
    RemoteCommand::script(&format!(
        "if [ -d {root} ]; then cd {root} && git pull; else git clone --recurse-submodules {url} {root}; fi",
        root = REMOTE_ROOT,
        url = INFRA_REPO_URL,
    ))
}

pub fn bootstrap_commands() -> Vec<RemoteCommand> {
    vec![
        clone_or_pull(),
        RemoteCommand::new("git")
            .args(["submodule", "update", "--init", "--recursive"])
            .current_dir(REMOTE_ROOT),
    ]
}

pub fn submodule_commands() -> Vec<RemoteCommand> {
    vec![
        RemoteCommand::new("git")
            .args(["submodule", "update", "--remote"])
            .current_dir(REMOTE_ROOT),
        RemoteCommand::new("git").arg("status").current_dir(REMOTE_ROOT),
    ]
}

/// Verify required tooling, then clone or refresh the infra checkout and
/// initialize its submodules. A failed tool check aborts before any
/// repository command runs.
pub fn setup(client: &SshClient) -> Result<SetupReport> {
    let mut preflight = Vec::new();
    for (tool, command) in preflight_commands() {
        let rendered = command.render();
        let output = client.execute(&rendered);
        if !output.success {
            return Err(Error::setup_preflight_failed(
                tool,
                &rendered,
                output.exit_code,
                &output.stderr,
            ));
        }
        preflight.push(PreflightCheck {
            tool: tool.to_string(),
            version: first_line(&output.stdout),
        });
    }

    let steps = run_steps(client, &bootstrap_commands())?;

    Ok(SetupReport { preflight, steps })
}

/// Update the terraform submodule to its latest remote commit and report the
/// resulting working tree status.
pub fn update_submodule(client: &SshClient) -> Result<Vec<StepReport>> {
    run_steps(client, &submodule_commands())
}

fn first_line(output: &str) -> String {
    output.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_checks_terraform_then_lxd() {
        let checks = preflight_commands();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].0, "terraform");
        assert_eq!(checks[0].1.render(), "terraform --version");
        assert_eq!(checks[1].0, "lxd");
        assert_eq!(checks[1].1.render(), "lxd --version");
    }

    #[test]
    fn bootstrap_clones_or_pulls_then_inits_submodules() {
        let rendered: Vec<String> = bootstrap_commands().iter().map(|c| c.render()).collect();
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].starts_with("if [ -d ~/infra ]; then cd ~/infra && git pull;"));
        assert!(rendered[0].contains("git clone --recurse-submodules"));
        assert_eq!(
            rendered[1],
            "cd ~/'infra' && git submodule update --init --recursive"
        );
    }

    #[test]
    fn submodule_update_then_status() {
        let rendered: Vec<String> = submodule_commands().iter().map(|c| c.render()).collect();
        assert_eq!(rendered[0], "cd ~/'infra' && git submodule update --remote");
        assert_eq!(rendered[1], "cd ~/'infra' && git status");
    }

    #[test]
    fn first_line_trims_version_banner() {
        assert_eq!(first_line("Terraform v1.9.5\non linux_amd64\n"), "Terraform v1.9.5");
        assert_eq!(first_line(""), "");
    }
}
