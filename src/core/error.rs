use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,

    ValidationInvalidArgument,

    PreflightToolNotFound,
    AuthNotAuthenticated,

    CommandNotFound,
    CommandFailed,

    RemoteCreationFailed,
    LocalStateError,

    RunInterrupted,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::PreflightToolNotFound => "preflight.tool_not_found",
            ErrorCode::AuthNotAuthenticated => "auth.not_authenticated",

            ErrorCode::CommandNotFound => "command.not_found",
            ErrorCode::CommandFailed => "command.failed",

            ErrorCode::RemoteCreationFailed => "remote.creation_failed",
            ErrorCode::LocalStateError => "local.state_error",

            ErrorCode::RunInterrupted => "run.interrupted",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolNotFoundDetails {
    pub missing: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotAuthenticatedDetails {
    pub host: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandNotFoundDetails {
    pub program: String,
    pub command: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCreationFailedDetails {
    pub repository: String,
    pub cause: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalStateDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let path = path.into();
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.clone(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            format!("Invalid JSON in {}: {}", path, err),
            details,
        )
        .with_hint("Fix the JSON syntax or delete the file to use built-in defaults")
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            id,
            tried,
        });

        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }

    /// All unresolved tools are reported together so the operator gets one
    /// remediation list.
    pub fn tool_not_found(missing: Vec<String>) -> Self {
        let message = format!("Missing tools: {}", missing.join(", "));
        Self::new(
            ErrorCode::PreflightToolNotFound,
            message,
            to_details(ToolNotFoundDetails { missing }),
        )
        .with_hint("Install the missing tools or re-run with --skip-checks")
    }

    pub fn not_authenticated(host: impl Into<String>, reason: impl Into<String>) -> Self {
        let host = host.into();
        let reason = reason.into();
        let message = format!("Not authenticated to {}: {}", host, reason);
        Self::new(
            ErrorCode::AuthNotAuthenticated,
            message,
            to_details(NotAuthenticatedDetails { host, reason }),
        )
        .with_hint("Run: gh auth login")
    }

    pub fn command_not_found(program: impl Into<String>, command: impl Into<String>) -> Self {
        let program = program.into();
        let message = format!("Command not found: {}", program);
        Self::new(
            ErrorCode::CommandNotFound,
            message,
            to_details(CommandNotFoundDetails {
                program,
                command: command.into(),
            }),
        )
    }

    pub fn command_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        let command = command.into();
        let message = format!("Command failed: {}", command);
        Self::new(
            ErrorCode::CommandFailed,
            message,
            to_details(CommandFailedDetails {
                command,
                exit_code,
                stderr: stderr.into(),
            }),
        )
    }

    /// Wraps the underlying failure; not-found and interrupt conditions keep
    /// their own code.
    pub fn remote_creation_failed(repository: impl Into<String>, cause: Error) -> Self {
        if matches!(
            cause.code,
            ErrorCode::CommandNotFound | ErrorCode::RunInterrupted
        ) {
            return cause;
        }

        let repository = repository.into();
        let message = format!("Could not create remote repository {}", repository);
        let cause_details = serde_json::json!({
            "code": cause.code.as_str(),
            "message": cause.message,
            "details": cause.details,
        });

        Self::new(
            ErrorCode::RemoteCreationFailed,
            message,
            to_details(RemoteCreationFailedDetails {
                repository,
                cause: cause_details,
            }),
        )
        .with_hint("The name may already be taken; choose another --repo-name")
    }

    pub fn local_state(error: impl Into<String>, path: impl Into<String>) -> Self {
        let error = error.into();
        let path = path.into();
        let message = format!("{} ({})", error, path);
        Self::new(
            ErrorCode::LocalStateError,
            message,
            to_details(LocalStateDetails { path, error }),
        )
    }

    pub fn interrupted() -> Self {
        Self::new(
            ErrorCode::RunInterrupted,
            "Deployment cancelled",
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(
            ErrorCode::InternalUnexpected,
            format!("Unexpected error: {}", error),
            serde_json::json!({ "error": error }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn is_interrupted(&self) -> bool {
        self.code == ErrorCode::RunInterrupted
    }

    /// Single-line operator diagnostic printed before a fatal exit.
    pub fn diagnostic(&self) -> String {
        if self.is_interrupted() {
            return self.message.clone();
        }

        let mut line = format!("Deployment failed: {}", self.message);
        if let Some(hint) = self.hints.first() {
            line.push_str(&format!(" ({})", hint.message));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_found_lists_every_missing_tool() {
        let err = Error::tool_not_found(vec!["docker".to_string(), "npm".to_string()]);
        assert_eq!(err.code.as_str(), "preflight.tool_not_found");
        assert_eq!(err.message, "Missing tools: docker, npm");
        assert_eq!(err.details["missing"], serde_json::json!(["docker", "npm"]));
    }

    #[test]
    fn not_authenticated_carries_login_hint() {
        let err = Error::not_authenticated("github.com", "no active session");
        assert_eq!(err.hints[0].message, "Run: gh auth login");
        assert_eq!(
            err.diagnostic(),
            "Deployment failed: Not authenticated to github.com: no active session \
             (Run: gh auth login)"
        );
    }

    #[test]
    fn interrupted_diagnostic_is_distinct() {
        let err = Error::interrupted();
        assert!(err.is_interrupted());
        assert_eq!(err.diagnostic(), "Deployment cancelled");
    }

    #[test]
    fn remote_creation_failed_wraps_command_failure() {
        let cause = Error::command_failed("gh repo create sampler", Some(1), "name already exists");
        let err = Error::remote_creation_failed("sampler", cause);
        assert_eq!(err.code, ErrorCode::RemoteCreationFailed);
        assert_eq!(err.details["cause"]["code"], "command.failed");
        assert_eq!(err.details["repository"], "sampler");
    }

    #[test]
    fn remote_creation_failed_keeps_not_found() {
        let cause = Error::command_not_found("gh", "gh repo create sampler");
        let err = Error::remote_creation_failed("sampler", cause);
        assert_eq!(err.code, ErrorCode::CommandNotFound);
    }

    #[test]
    fn command_failed_omits_empty_stderr() {
        let err = Error::command_failed("git push origin HEAD", Some(128), "");
        assert_eq!(err.details["exitCode"], 128);
        assert!(err.details.get("stderr").is_none());
    }
}
