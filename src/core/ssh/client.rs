use std::process::{Command, Stdio};

use crate::target::ConnectionTarget;

pub struct SshClient {
    pub host: String,
    pub user: String,
    /// When true, all commands run locally instead of over SSH.
    /// Set automatically when the target host is localhost/127.0.0.1/::1.
    pub is_local: bool,
}

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
}

impl SshClient {
    pub fn connect(target: &ConnectionTarget) -> Self {
        let is_local = is_local_host(&target.host);
        if is_local {
            log_status!(
                "ssh",
                "Target '{}' is localhost, running commands locally",
                target.host
            );
        }

        Self {
            host: target.host.clone(),
            user: target.user.clone(),
            is_local,
        }
    }

    fn build_ssh_args(&self, command: Option<&str>, interactive: bool) -> Vec<String> {
        let mut args = Vec::new();

        // For non-interactive commands, add timeout and keepalive options
        // to prevent hangs on stalled connections or unexpected prompts.
        if !interactive {
            args.extend([
                "-o".to_string(),
                "BatchMode=yes".to_string(),
                "-o".to_string(),
                "ConnectTimeout=10".to_string(),
                "-o".to_string(),
                "ServerAliveInterval=15".to_string(),
                "-o".to_string(),
                "ServerAliveCountMax=3".to_string(),
            ]);
        }

        args.push(format!("{}@{}", self.user, self.host));

        if let Some(cmd) = command {
            args.push(cmd.to_string());
        }

        args
    }

    /// Run a command and capture its output. Each command is an independent
    /// `ssh` process, run exactly once; there is no retry.
    pub fn execute(&self, command: &str) -> CommandOutput {
        if self.is_local {
            return execute_local_command(command);
        }

        let args = self.build_ssh_args(Some(command), false);
        let output = Command::new("ssh").args(&args).output();

        match output {
            Ok(out) => CommandOutput {
                stdout: String::from_utf8_lossy(&out.stdout).to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).to_string(),
                success: out.status.success(),
                exit_code: out.status.code().unwrap_or(-1),
            },
            Err(e) => CommandOutput {
                stdout: String::new(),
                stderr: format!("SSH error: {}", e),
                success: false,
                exit_code: -1,
            },
        }
    }

    /// Run a command with the local TTY attached, for prompts and streaming
    /// output (terraform confirmations, journalctl -f, container shells).
    pub fn execute_interactive(&self, command: Option<&str>) -> i32 {
        if self.is_local {
            return match command {
                Some(cmd) => execute_local_command_interactive(cmd),
                None => execute_local_command_interactive("bash"),
            };
        }

        let mut args = vec!["-t".to_string()];
        args.extend(self.build_ssh_args(command, true));

        let status = Command::new("ssh")
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(s) => s.code().unwrap_or(-1),
            Err(_) => -1,
        }
    }
}

pub fn execute_local_command(command: &str) -> CommandOutput {
    let output = Command::new("sh").args(["-c", command]).output();

    match output {
        Ok(out) => CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            success: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
        },
        Err(e) => CommandOutput {
            stdout: String::new(),
            stderr: format!("Command error: {}", e),
            success: false,
            exit_code: -1,
        },
    }
}

fn execute_local_command_interactive(command: &str) -> i32 {
    let status = Command::new("sh")
        .args(["-c", command])
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    match status {
        Ok(s) => s.code().unwrap_or(-1),
        Err(_) => -1,
    }
}

/// Check if a host address refers to the local machine.
pub fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_client() -> SshClient {
        SshClient::connect(&ConnectionTarget {
            host: "localhost".to_string(),
            user: "ops".to_string(),
        })
    }

    #[test]
    fn localhost_addresses_are_local() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("::1"));
        assert!(!is_local_host("10.0.0.5"));
        assert!(!is_local_host("lxd-host.lan"));
    }

    #[test]
    fn local_execution_captures_stdout_and_exit_code() {
        let out = local_client().execute("printf hello");
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "hello");
    }

    #[test]
    fn local_execution_mirrors_failing_exit_code() {
        let out = local_client().execute("exit 3");
        assert!(!out.success);
        assert_eq!(out.exit_code, 3);
    }
}
