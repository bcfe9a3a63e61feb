use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigUnresolvedTarget,

    ValidationInvalidArgument,

    SetupPreflightFailed,

    RemoteCommandFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigUnresolvedTarget => "config.unresolved_target",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::SetupPreflightFailed => "setup.preflight_failed",

            ErrorCode::RemoteCommandFailed => "remote.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedTargetDetails {
    pub field: String,
    pub env_var: String,
    pub placeholder: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightFailedDetails {
    pub tool: String,
    pub command: String,
    pub exit_code: i32,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDetails {
    pub host: String,
    pub user: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub target: TargetDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    /// Exit code of the failed subprocess, when this error wraps one.
    pub fn exit_status(&self) -> Option<i32> {
        self.details
            .get("exitCode")
            .and_then(Value::as_i64)
            .map(|code| code as i32)
    }

    pub fn config_unresolved_target(field: impl Into<String>, env_var: impl Into<String>) -> Self {
        let field = field.into();
        let env_var = env_var.into();
        let message = format!(
            "Connection {} is not configured. Set {} or pass --{}",
            field, env_var, field
        );
        let details = to_details(UnresolvedTargetDetails {
            placeholder: if field == "host" {
                crate::defaults::PLACEHOLDER_HOST.to_string()
            } else {
                crate::defaults::PLACEHOLDER_USER.to_string()
            },
            field,
            env_var,
        });
        Self::new(ErrorCode::ConfigUnresolvedTarget, message, details)
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        });
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn setup_preflight_failed(
        tool: &str,
        command: &str,
        exit_code: i32,
        stderr: &str,
    ) -> Self {
        let details = to_details(PreflightFailedDetails {
            tool: tool.to_string(),
            command: command.to_string(),
            exit_code,
            stderr: stderr.to_string(),
        });
        Self::new(
            ErrorCode::SetupPreflightFailed,
            format!("Required tool '{}' is not available on the target host", tool),
            details,
        )
    }

    pub fn remote_command_failed(
        command: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
        host: &str,
        user: &str,
    ) -> Self {
        let details = to_details(RemoteCommandFailedDetails {
            command: command.to_string(),
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            target: TargetDetails {
                host: host.to_string(),
                user: user.to_string(),
            },
        });
        Self::new(
            ErrorCode::RemoteCommandFailed,
            format!("Remote command failed with exit code {}", exit_code),
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let details = to_details(InternalErrorDetails {
            error: error.clone(),
            context,
        });
        Self::new(ErrorCode::InternalIoError, error, details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let details = to_details(InternalErrorDetails {
            error: error.clone(),
            context,
        });
        Self::new(ErrorCode::InternalJsonError, error, details)
    }

    pub fn internal_unexpected(message: impl Into<String>) -> Self {
        let message = message.into();
        let details = to_details(InternalErrorDetails {
            error: message.clone(),
            context: None,
        });
        Self::new(ErrorCode::InternalUnexpected, message, details)
    }
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_command_failed_carries_exit_status() {
        let err = Error::remote_command_failed("terraform init", 3, "", "boom", "10.0.0.5", "ops");
        assert_eq!(err.code.as_str(), "remote.command_failed");
        assert_eq!(err.exit_status(), Some(3));
    }

    #[test]
    fn unresolved_host_names_env_var() {
        let err = Error::config_unresolved_target("host", "TFDEPLOY_HOST");
        assert_eq!(err.code, ErrorCode::ConfigUnresolvedTarget);
        assert!(err.message.contains("TFDEPLOY_HOST"));
        assert!(err.message.contains("--host"));
        assert_eq!(err.exit_status(), None);
    }
}
