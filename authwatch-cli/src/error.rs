//! CLI-specific error types and exit code mapping

use authwatch_analyzer::LogAnalyzerError;
use authwatch_core::error::AuthwatchError;
use authwatch_core::types::Severity;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// `--fail-on` threshold reached.
    #[error("{count} incident(s) at or above {threshold} severity")]
    IncidentsFound { count: usize, threshold: Severity },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Analyzer construction error (pattern compilation, unknown rule, ...).
    #[error("analyzer error: {0}")]
    Analyzer(#[from] LogAnalyzerError),
}

impl From<AuthwatchError> for CliError {
    fn from(e: AuthwatchError) -> Self {
        match e {
            AuthwatchError::Io(io) => Self::Io(io),
            AuthwatchError::Config(c) => Self::Config(c.to_string()),
            AuthwatchError::Detection(d) => Self::Command(d.to_string()),
        }
    }
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error                       |
    /// | 4    | Incidents at or above `--fail-on` found   |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Analyzer(LogAnalyzerError::UnknownRule(_) | LogAnalyzerError::Config { .. }) => 2,
            Self::IncidentsFound { .. } => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Analyzer(_) => 1,
        }
    }
}
