//! Terraform task command builders and executors.
//!
//! Each task has a pure `*_commands` builder producing the ordered command
//! list, and an executor that runs it over an established connection,
//! aborting the whole task on the first non-zero exit.

use serde::Serialize;

use crate::defaults::{MACVLAN_SCENARIO, SSH_PUBLIC_KEY_FILE, TERRAFORM_ROOT};
use crate::error::Result;
use crate::remote::{run_step, run_step_interactive, run_steps, RemoteCommand, StepReport};
use crate::ssh::SshClient;
use crate::utils::shell;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub task: String,
    pub scenario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub steps: Vec<StepReport>,
}

pub fn scenario_dir(scenario: &str) -> String {
    format!("{}/scenarios/{}", TERRAFORM_ROOT, scenario)
}

/// The `ssh_public_key` input variable. The key file is read on the remote
/// host, so the `$(cat ...)` substitution must survive quoting; the path
/// itself is a fixed constant.
fn public_key_var() -> String {
    format!(
        "-var \"ssh_public_key=$(cat {})\"",
        shell::quote_remote_path(SSH_PUBLIC_KEY_FILE)
    )
}

fn workspace_select(scenario: &str, environment: &str) -> RemoteCommand {
    RemoteCommand::new("terraform")
        .args(["workspace", "select"])
        .arg(environment)
        .current_dir(scenario_dir(scenario))
}

fn workspace_select_or_create(scenario: &str, environment: &str) -> RemoteCommand {
    RemoteCommand::new("terraform")
        .args(["workspace", "select"])
        .arg(environment)
        .or_else(
            RemoteCommand::new("terraform")
                .args(["workspace", "new"])
                .arg(environment),
        )
        .current_dir(scenario_dir(scenario))
}

fn apply_command(scenario: &str, auto_approve: bool) -> RemoteCommand {
    let mut command = RemoteCommand::new("terraform").arg("apply");
    if auto_approve {
        command = command.arg("-auto-approve");
    }
    command
        .raw_arg(public_key_var())
        .current_dir(scenario_dir(scenario))
}

fn destroy_command(scenario: &str) -> RemoteCommand {
    RemoteCommand::new("terraform")
        .arg("destroy")
        .raw_arg(public_key_var())
        .current_dir(scenario_dir(scenario))
}

pub fn init_commands(scenario: &str) -> Vec<RemoteCommand> {
    vec![RemoteCommand::new("terraform")
        .arg("init")
        .current_dir(scenario_dir(scenario))]
}

pub fn plan_commands(scenario: &str, environment: &str) -> Vec<RemoteCommand> {
    vec![
        workspace_select_or_create(scenario, environment),
        RemoteCommand::new("terraform")
            .arg("plan")
            .raw_arg(public_key_var())
            .current_dir(scenario_dir(scenario)),
    ]
}

/// The workspace must already exist here; unlike `plan` there is no
/// select-or-create fallback.
pub fn apply_commands(scenario: &str, environment: &str, auto_approve: bool) -> Vec<RemoteCommand> {
    vec![
        workspace_select(scenario, environment),
        apply_command(scenario, auto_approve),
    ]
}

pub fn destroy_commands(scenario: &str, environment: &str) -> Vec<RemoteCommand> {
    vec![workspace_select(scenario, environment), destroy_command(scenario)]
}

pub fn validate_commands(scenario: &str) -> Vec<RemoteCommand> {
    vec![
        RemoteCommand::new("terraform")
            .arg("validate")
            .current_dir(scenario_dir(scenario)),
        RemoteCommand::new("terraform")
            .args(["fmt", "-check"])
            .current_dir(scenario_dir(scenario)),
    ]
}

/// Connectivity test scripts, run from the Terraform root. The macvlan
/// scenario carries two extra checks before the generic VM test.
pub fn connectivity_commands(scenario: &str) -> Vec<RemoteCommand> {
    let mut commands = Vec::new();
    if scenario == MACVLAN_SCENARIO {
        commands.push(
            RemoteCommand::new("./test-macvlan-connectivity.sh").current_dir(TERRAFORM_ROOT),
        );
        commands.push(
            RemoteCommand::new("./test-external-connectivity.sh").current_dir(TERRAFORM_ROOT),
        );
    }
    commands.push(RemoteCommand::new("./vm-connectivity-test.sh").current_dir(TERRAFORM_ROOT));
    commands
}

pub fn init(client: &SshClient, scenario: &str) -> Result<TaskReport> {
    Ok(TaskReport {
        task: "init".to_string(),
        scenario: scenario.to_string(),
        environment: None,
        steps: run_steps(client, &init_commands(scenario))?,
    })
}

pub fn plan(client: &SshClient, scenario: &str, environment: &str) -> Result<TaskReport> {
    Ok(TaskReport {
        task: "plan".to_string(),
        scenario: scenario.to_string(),
        environment: Some(environment.to_string()),
        steps: run_steps(client, &plan_commands(scenario, environment))?,
    })
}

/// Without `auto_approve` the apply step runs with the TTY attached so
/// Terraform's confirmation prompt reaches the operator.
pub fn apply(
    client: &SshClient,
    scenario: &str,
    environment: &str,
    auto_approve: bool,
) -> Result<TaskReport> {
    let select = workspace_select(scenario, environment);
    let apply = apply_command(scenario, auto_approve);

    let mut steps = vec![run_step(client, &select)?];
    if auto_approve {
        steps.push(run_step(client, &apply)?);
    } else {
        steps.push(run_step_interactive(client, &apply)?);
    }

    Ok(TaskReport {
        task: "apply".to_string(),
        scenario: scenario.to_string(),
        environment: Some(environment.to_string()),
        steps,
    })
}

/// Destroy always confirms interactively; there is no auto-approve path.
pub fn destroy(client: &SshClient, scenario: &str, environment: &str) -> Result<TaskReport> {
    let select = workspace_select(scenario, environment);
    let destroy = destroy_command(scenario);

    let steps = vec![
        run_step(client, &select)?,
        run_step_interactive(client, &destroy)?,
    ];

    Ok(TaskReport {
        task: "destroy".to_string(),
        scenario: scenario.to_string(),
        environment: Some(environment.to_string()),
        steps,
    })
}

pub fn validate(client: &SshClient, scenario: &str) -> Result<TaskReport> {
    Ok(TaskReport {
        task: "validate".to_string(),
        scenario: scenario.to_string(),
        environment: None,
        steps: run_steps(client, &validate_commands(scenario))?,
    })
}

pub fn connectivity_test(client: &SshClient, scenario: &str) -> Result<TaskReport> {
    Ok(TaskReport {
        task: "test".to_string(),
        scenario: scenario.to_string(),
        environment: None,
        steps: run_steps(client, &connectivity_commands(scenario))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_renders_in_scenario_dir() {
        let commands = init_commands("bridge-networking");
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].render(),
            "cd ~/'infra/terraform/scenarios/bridge-networking' && terraform init"
        );
    }

    #[test]
    fn plan_selects_or_creates_workspace_then_plans() {
        let rendered: Vec<String> = plan_commands("bridge-networking", "dev")
            .iter()
            .map(RemoteCommand::render)
            .collect();
        assert_eq!(rendered.len(), 2);
        assert_eq!(
            rendered[0],
            "cd ~/'infra/terraform/scenarios/bridge-networking' && (terraform workspace select dev || terraform workspace new dev)"
        );
        assert_eq!(
            rendered[1],
            "cd ~/'infra/terraform/scenarios/bridge-networking' && terraform plan -var \"ssh_public_key=$(cat ~/'infra/terraform/id_ed25519.pub')\""
        );
    }

    #[test]
    fn apply_select_has_no_create_fallback() {
        let rendered = apply_commands("bridge-networking", "staging", false)[0].render();
        assert_eq!(
            rendered,
            "cd ~/'infra/terraform/scenarios/bridge-networking' && terraform workspace select staging"
        );
    }

    #[test]
    fn apply_appends_auto_approve_only_when_flagged() {
        let without = apply_commands("bridge-networking", "dev", false)[1].render();
        let with = apply_commands("bridge-networking", "dev", true)[1].render();
        assert!(!without.contains("-auto-approve"));
        assert!(with.contains("terraform apply -auto-approve -var"));
    }

    #[test]
    fn destroy_selects_then_destroys() {
        let rendered: Vec<String> = destroy_commands("bridge-networking", "prod")
            .iter()
            .map(RemoteCommand::render)
            .collect();
        assert!(rendered[0].ends_with("terraform workspace select prod"));
        assert!(rendered[1].contains("terraform destroy -var"));
        assert!(!rendered[1].contains("-auto-approve"));
    }

    #[test]
    fn validate_runs_validate_then_fmt_check() {
        let rendered: Vec<String> = validate_commands("macvlan-networking")
            .iter()
            .map(RemoteCommand::render)
            .collect();
        assert!(rendered[0].ends_with("terraform validate"));
        assert!(rendered[1].ends_with("terraform fmt -check"));
    }

    #[test]
    fn macvlan_scenario_runs_three_scripts_in_order() {
        let rendered: Vec<String> = connectivity_commands("macvlan-networking")
            .iter()
            .map(RemoteCommand::render)
            .collect();
        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].contains("./test-macvlan-connectivity.sh"));
        assert!(rendered[1].contains("./test-external-connectivity.sh"));
        assert!(rendered[2].contains("./vm-connectivity-test.sh"));
    }

    #[test]
    fn other_scenarios_run_only_the_vm_script() {
        let commands = connectivity_commands("bridge-networking");
        assert_eq!(commands.len(), 1);
        assert!(commands[0].render().contains("./vm-connectivity-test.sh"));
    }

    #[test]
    fn hostile_scenario_and_environment_stay_quoted() {
        let rendered = plan_commands("s; reboot", "dev && whoami")[0].render();
        assert_eq!(
            rendered,
            "cd ~/'infra/terraform/scenarios/s; reboot' && (terraform workspace select 'dev && whoami' || terraform workspace new 'dev && whoami')"
        );
    }
}
