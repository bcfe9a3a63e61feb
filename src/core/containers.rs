//! k3s container inspection over lxc.
//!
//! Absence of a container is a typed query outcome, not an error: `status`,
//! `logs`, and `shell` report it and exit cleanly.

use crate::error::Result;
use crate::remote::{run_step, RemoteCommand};
use crate::ssh::SshClient;

/// Cluster containers follow a fixed naming convention per environment.
pub fn container_name(environment: &str) -> String {
    format!("k3s-{}-cluster-01", environment)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerQuery {
    Found,
    NotFound,
}

fn list_command() -> RemoteCommand {
    RemoteCommand::new("lxc").args(["list", "--format", "csv", "-c", "n"])
}

fn parse_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// All containers whose name mentions k3s. An empty result is a normal
/// outcome; only transport or lxc failures are errors.
pub fn list_k3s(client: &SshClient) -> Result<Vec<String>> {
    let report = run_step(client, &list_command())?;
    Ok(parse_names(&report.stdout)
        .into_iter()
        .filter(|name| name.contains("k3s"))
        .collect())
}

pub fn find(client: &SshClient, name: &str) -> Result<ContainerQuery> {
    let report = run_step(client, &list_command())?;
    if parse_names(&report.stdout).iter().any(|n| n == name) {
        Ok(ContainerQuery::Found)
    } else {
        Ok(ContainerQuery::NotFound)
    }
}

/// Stream the k3s unit journal from the environment's container. Returns the
/// stream's exit code, or None when the container does not exist.
pub fn logs(client: &SshClient, environment: &str) -> Result<Option<i32>> {
    let name = container_name(environment);
    match find(client, &name)? {
        ContainerQuery::NotFound => {
            log_status!("logs", "Container '{}' not found", name);
            Ok(None)
        }
        ContainerQuery::Found => {
            let command = RemoteCommand::new("lxc")
                .arg("exec")
                .arg(&name)
                .raw_arg("--")
                .args(["journalctl", "-u", "k3s", "-f"])
                .render();
            Ok(Some(client.execute_interactive(Some(&command))))
        }
    }
}

/// Open an interactive shell inside the environment's container.
pub fn shell(client: &SshClient, environment: &str) -> Result<Option<i32>> {
    let name = container_name(environment);
    match find(client, &name)? {
        ContainerQuery::NotFound => {
            log_status!("shell", "Container '{}' not found", name);
            Ok(None)
        }
        ContainerQuery::Found => {
            let command = RemoteCommand::new("lxc")
                .arg("exec")
                .arg(&name)
                .raw_arg("--")
                .arg("bash")
                .render();
            Ok(Some(client.execute_interactive(Some(&command))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_name_follows_cluster_convention() {
        assert_eq!(container_name("dev"), "k3s-dev-cluster-01");
        assert_eq!(container_name("prod"), "k3s-prod-cluster-01");
    }

    #[test]
    fn parse_names_skips_blank_lines() {
        let names = parse_names("k3s-dev-cluster-01\n\nweb-01\n");
        assert_eq!(names, ["k3s-dev-cluster-01", "web-01"]);
    }

    #[test]
    fn list_command_asks_lxc_for_csv_names() {
        assert_eq!(list_command().render(), "lxc list --format csv -c n");
    }

    #[test]
    fn exec_command_quotes_the_container_name() {
        let command = RemoteCommand::new("lxc")
            .arg("exec")
            .arg("k3s-dev-cluster-01")
            .raw_arg("--")
            .args(["journalctl", "-u", "k3s", "-f"])
            .render();
        assert_eq!(command, "lxc exec k3s-dev-cluster-01 -- journalctl -u k3s -f");
    }
}
