//! Structured remote command construction and execution.
//!
//! Commands are built as argument arrays and rendered with shell quoting, so
//! scenario and environment identifiers never reach the remote shell as raw
//! syntax. The only unquoted material is fixed program names and the few
//! constant fragments that rely on remote shell expansion.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::ssh::SshClient;
use crate::utils::shell;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    /// Quoted on render. All caller-supplied values go through here.
    Arg(String),
    /// Rendered verbatim. Reserved for program names and fixed constants
    /// that need remote shell expansion (the `$(cat ...)` key read).
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    parts: Vec<Part>,
    cwd: Option<String>,
    fallback: Option<Box<RemoteCommand>>,
}

impl RemoteCommand {
    pub fn new(program: &str) -> Self {
        Self {
            parts: vec![Part::Raw(program.to_string())],
            cwd: None,
            fallback: None,
        }
    }

    /// A fixed multi-statement script. Never used with caller-supplied values.
    pub fn script(script: &str) -> Self {
        Self {
            parts: vec![Part::Raw(script.trim().to_string())],
            cwd: None,
            fallback: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.parts.push(Part::Arg(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self.parts.push(Part::Arg(arg.into()));
        }
        self
    }

    /// Verbatim fragment. Only for fixed constants that rely on remote shell
    /// expansion; never for caller-supplied values.
    pub fn raw_arg(mut self, fragment: impl Into<String>) -> Self {
        self.parts.push(Part::Raw(fragment.into()));
        self
    }

    /// Remote working directory, rendered as a `cd ... &&` prefix. The
    /// directory is quoted with its leading tilde preserved.
    pub fn current_dir(mut self, dir: impl Into<String>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Fallback command, rendered as `(self || fallback)` so the group binds
    /// tighter than the `cd` prefix and the fallback runs in the same
    /// directory.
    pub fn or_else(mut self, fallback: RemoteCommand) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    fn render_body(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Arg(arg) => shell::quote_arg(arg),
                Part::Raw(raw) => raw.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn render(&self) -> String {
        let body = match &self.fallback {
            Some(fallback) => format!("({} || {})", self.render_body(), fallback.render_body()),
            None => self.render_body(),
        };

        match &self.cwd {
            Some(dir) => format!("cd {} && {}", shell::quote_remote_path(dir), body),
            None => body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

/// Run one command, capturing output. Non-zero exit aborts with a
/// `remote.command_failed` error carrying the subprocess exit code.
pub fn run_step(client: &SshClient, command: &RemoteCommand) -> Result<StepReport> {
    let rendered = command.render();
    let output = client.execute(&rendered);

    if !output.success {
        return Err(Error::remote_command_failed(
            &rendered,
            output.exit_code,
            &output.stdout,
            &output.stderr,
            &client.host,
            &client.user,
        ));
    }

    Ok(StepReport {
        command: rendered,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Run one command with the TTY attached (terraform confirmations, journal
/// streaming). Output is not captured.
pub fn run_step_interactive(client: &SshClient, command: &RemoteCommand) -> Result<StepReport> {
    let rendered = command.render();
    let exit_code = client.execute_interactive(Some(&rendered));

    if exit_code != 0 {
        return Err(Error::remote_command_failed(
            &rendered, exit_code, "", "", &client.host, &client.user,
        ));
    }

    Ok(StepReport {
        command: rendered,
        stdout: String::new(),
        stderr: String::new(),
    })
}

/// Run commands in order, aborting on the first failure. Earlier steps are
/// not rolled back.
pub fn run_steps(client: &SshClient, commands: &[RemoteCommand]) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(commands.len());
    for command in commands {
        reports.push(run_step(client, command)?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::target::ConnectionTarget;

    #[test]
    fn renders_program_and_quoted_args() {
        let cmd = RemoteCommand::new("terraform")
            .args(["workspace", "select"])
            .arg("dev");
        assert_eq!(cmd.render(), "terraform workspace select dev");
    }

    #[test]
    fn quotes_hostile_args() {
        let cmd = RemoteCommand::new("terraform")
            .arg("workspace")
            .arg("select")
            .arg("dev; rm -rf /");
        assert_eq!(
            cmd.render(),
            "terraform workspace select 'dev; rm -rf /'"
        );
    }

    #[test]
    fn renders_cwd_prefix_with_tilde_preserved() {
        let cmd = RemoteCommand::new("terraform")
            .arg("init")
            .current_dir("~/infra/terraform/scenarios/bridge-networking");
        assert_eq!(
            cmd.render(),
            "cd ~/'infra/terraform/scenarios/bridge-networking' && terraform init"
        );
    }

    #[test]
    fn fallback_groups_before_cwd_prefix() {
        let cmd = RemoteCommand::new("terraform")
            .args(["workspace", "select", "dev"])
            .or_else(RemoteCommand::new("terraform").args(["workspace", "new", "dev"]))
            .current_dir("~/infra/terraform/scenarios/s1");
        assert_eq!(
            cmd.render(),
            "cd ~/'infra/terraform/scenarios/s1' && (terraform workspace select dev || terraform workspace new dev)"
        );
    }

    #[test]
    fn step_sequence_aborts_on_first_failure() {
        let client = SshClient::connect(&ConnectionTarget {
            host: "localhost".to_string(),
            user: "ops".to_string(),
        });
        let marker = std::env::temp_dir().join(format!("tfdeploy-step-abort-{}", std::process::id()));
        let marker_path = marker.to_str().unwrap().to_string();

        let commands = [
            RemoteCommand::new("true"),
            RemoteCommand::script("exit 7"),
            RemoteCommand::new("touch").arg(marker_path),
        ];

        let err = run_steps(&client, &commands).unwrap_err();
        assert_eq!(err.code, ErrorCode::RemoteCommandFailed);
        assert_eq!(err.exit_status(), Some(7));
        // The step after the failure must never have run.
        assert!(!marker.exists());
    }

    #[test]
    fn raw_fragments_render_verbatim() {
        let cmd = RemoteCommand::new("terraform")
            .arg("plan")
            .raw_arg("-var \"ssh_public_key=$(cat key.pub)\"");
        assert_eq!(
            cmd.render(),
            "terraform plan -var \"ssh_public_key=$(cat key.pub)\""
        );
    }
}
