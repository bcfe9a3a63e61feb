//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use serde::Serialize;
use tfdeploy::{Error, ErrorCode, Result};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) {
    use std::io::{self, Write};

    let payload = match serde_json::to_string_pretty(response) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("Failed to serialize response: {}", e);
            return;
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Ignore BrokenPipe so piping into `head` exits gracefully.
    let _ = writeln!(handle, "{}", payload);
}

pub fn print_error(err: &Error) {
    print_response(&CliResponse::<()>::from_error(err));
}

pub fn print_json_result(result: Result<serde_json::Value>) {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_error(&err),
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(&err);
            (Err(err), exit_code)
        }
    }
}

/// Command failures mirror the failing subprocess's exit code; configuration
/// and validation problems exit 2; internal errors exit 1.
fn exit_code_for_error(err: &Error) -> i32 {
    match err.code {
        ErrorCode::ConfigUnresolvedTarget | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::RemoteCommandFailed | ErrorCode::SetupPreflightFailed => err
            .exit_status()
            .filter(|code| *code > 0)
            .unwrap_or(20),

        ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_exit_code_mirrors_subprocess() {
        let err = Error::remote_command_failed("terraform plan", 3, "", "", "h", "u");
        let (_, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));
        assert_eq!(exit_code, 3);
    }

    #[test]
    fn spawn_failure_falls_back_to_generic_code() {
        let err = Error::remote_command_failed("terraform plan", -1, "", "", "h", "u");
        let (_, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));
        assert_eq!(exit_code, 20);
    }

    #[test]
    fn configuration_errors_exit_two() {
        let err = Error::config_unresolved_target("host", "TFDEPLOY_HOST");
        let (_, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));
        assert_eq!(exit_code, 2);
    }

    #[test]
    fn success_keeps_command_exit_code() {
        let (result, exit_code) =
            map_cmd_result_to_json(Ok((serde_json::json!({"ok": true}), 0)));
        assert!(result.is_ok());
        assert_eq!(exit_code, 0);
    }
}
