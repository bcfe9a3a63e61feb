//! Connection target resolution.
//!
//! A target is resolved once per invocation, at the CLI boundary, from
//! explicit arguments, environment variables, and built-in placeholder
//! defaults, in that precedence order per field.

use serde::Serialize;

use crate::defaults::{HOST_ENV, PLACEHOLDER_HOST, PLACEHOLDER_USER, USER_ENV};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTarget {
    pub host: String,
    pub user: String,
}

/// Resolve a connection target from explicit arguments and the process
/// environment.
pub fn resolve(explicit_host: Option<&str>, explicit_user: Option<&str>) -> Result<ConnectionTarget> {
    resolve_with(
        explicit_host,
        explicit_user,
        std::env::var(HOST_ENV).ok(),
        std::env::var(USER_ENV).ok(),
    )
}

/// Pure resolution: explicit argument wins over environment variable, which
/// wins over the built-in placeholder, independently for host and user.
///
/// A placeholder value is never accepted, regardless of which source produced
/// it. Host is checked before user, so a fully unconfigured resolution cites
/// the host.
pub fn resolve_with(
    explicit_host: Option<&str>,
    explicit_user: Option<&str>,
    env_host: Option<String>,
    env_user: Option<String>,
) -> Result<ConnectionTarget> {
    let host = pick(explicit_host, env_host, PLACEHOLDER_HOST);
    let user = pick(explicit_user, env_user, PLACEHOLDER_USER);

    if host == PLACEHOLDER_HOST {
        return Err(Error::config_unresolved_target("host", HOST_ENV));
    }
    if user == PLACEHOLDER_USER {
        return Err(Error::config_unresolved_target("user", USER_ENV));
    }

    Ok(ConnectionTarget { host, user })
}

fn pick(explicit: Option<&str>, env: Option<String>, fallback: &str) -> String {
    if let Some(value) = explicit {
        if !value.is_empty() {
            return value.to_string();
        }
    }
    if let Some(value) = env {
        if !value.is_empty() {
            return value;
        }
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn nothing_configured_cites_host() {
        let err = resolve_with(None, None, None, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigUnresolvedTarget);
        assert_eq!(err.details["field"], "host");
    }

    #[test]
    fn host_configured_but_user_missing_cites_user() {
        let err = resolve_with(Some("10.0.0.5"), None, None, None).unwrap_err();
        assert_eq!(err.details["field"], "user");
    }

    #[test]
    fn explicit_arg_with_env_var_user() {
        let target =
            resolve_with(Some("10.0.0.5"), None, None, Some("ops".to_string())).unwrap();
        assert_eq!(
            target,
            ConnectionTarget {
                host: "10.0.0.5".to_string(),
                user: "ops".to_string(),
            }
        );
    }

    #[test]
    fn explicit_arg_wins_over_env_var() {
        let target = resolve_with(
            Some("10.0.0.5"),
            Some("deploy"),
            Some("other-host".to_string()),
            Some("other-user".to_string()),
        )
        .unwrap();
        assert_eq!(target.host, "10.0.0.5");
        assert_eq!(target.user, "deploy");
    }

    #[test]
    fn env_var_wins_over_placeholder() {
        let target = resolve_with(
            None,
            None,
            Some("lxd-host.lan".to_string()),
            Some("ops".to_string()),
        )
        .unwrap();
        assert_eq!(target.host, "lxd-host.lan");
        assert_eq!(target.user, "ops");
    }

    #[test]
    fn empty_explicit_arg_falls_back_to_env_var() {
        let target = resolve_with(
            Some(""),
            Some(""),
            Some("lxd-host.lan".to_string()),
            Some("ops".to_string()),
        )
        .unwrap();
        assert_eq!(target.host, "lxd-host.lan");
        assert_eq!(target.user, "ops");
    }

    #[test]
    fn explicitly_passed_placeholder_is_still_rejected() {
        let err = resolve_with(
            Some(PLACEHOLDER_HOST),
            Some("ops"),
            Some("real-host".to_string()),
            None,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigUnresolvedTarget);
        assert_eq!(err.details["field"], "host");
    }

    #[test]
    fn placeholder_via_env_var_is_rejected() {
        let err = resolve_with(
            None,
            None,
            Some("10.0.0.5".to_string()),
            Some(PLACEHOLDER_USER.to_string()),
        )
        .unwrap_err();
        assert_eq!(err.details["field"], "user");
    }

    #[test]
    fn non_placeholder_pair_is_returned_unmodified() {
        let target = resolve_with(Some("host-a"), Some("user-b"), None, None).unwrap();
        assert_eq!(target.host, "host-a");
        assert_eq!(target.user, "user-b");
    }
}
