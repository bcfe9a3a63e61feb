//! Fixed constants for the remote deployment layout.
//!
//! Everything here is consumed explicitly by the target resolver and the
//! command builders; nothing reads these implicitly deep in a call stack.

/// Environment variable supplying the remote host.
pub const HOST_ENV: &str = "TFDEPLOY_HOST";

/// Environment variable supplying the SSH user.
pub const USER_ENV: &str = "TFDEPLOY_USER";

/// Sentinel default signaling "host not configured". Resolution rejects this
/// value no matter which source supplied it.
pub const PLACEHOLDER_HOST: &str = "your-remote-host";

/// Sentinel default signaling "user not configured".
pub const PLACEHOLDER_USER: &str = "your-username";

pub const DEFAULT_SCENARIO: &str = "bridge-networking";
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Environments deployed by `deploy-all`, in order. Strictly sequential:
/// Terraform workspace operations against the same backend are not safe to
/// run concurrently.
pub const ROLLOUT_ORDER: [&str; 3] = ["dev", "staging", "prod"];

/// Repository cloned onto the target host by `setup`.
pub const INFRA_REPO_URL: &str = "https://github.com/k3s-lab/infra.git";

/// Where `setup` places the infra checkout on the target host.
pub const REMOTE_ROOT: &str = "~/infra";

/// Terraform root inside the checkout. Connectivity test scripts live here.
pub const TERRAFORM_ROOT: &str = "~/infra/terraform";

/// Public key passed to Terraform as the `ssh_public_key` input variable.
/// Read on the remote host at plan/apply/destroy time.
pub const SSH_PUBLIC_KEY_FILE: &str = "~/infra/terraform/id_ed25519.pub";

/// Scenario that carries two extra connectivity test scripts.
pub const MACVLAN_SCENARIO: &str = "macvlan-networking";
