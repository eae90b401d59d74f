use std::path::PathBuf;

use xmldb_codec::CodecError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage / configuration error
/// - 3: a file failed to parse or validate
/// - 4: every file parsed but at least one is not canonical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ParseError = 3,
    NotCanonical = 4,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured
/// output in JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A single file failed to parse.
    #[error("{file}: {error}")]
    Codec {
        error: CodecError,
        source_text: String,
        file: PathBuf,
    },

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// User cancelled operation.
    #[error("operation cancelled")]
    Cancelled,

    /// No install.xml found under a path.
    #[error("no install.xml files found in {path}")]
    NoInstallFiles { path: PathBuf },

    /// Non-TTY requires --yes for rewriting files.
    #[error("rewriting files requires --yes in non-interactive mode")]
    RequiresConfirmation,

    /// A batch finished with failures; individual results are already reported.
    #[error("{failed} file(s) failed and {mismatched} file(s) are not canonical")]
    CheckFailed { failed: usize, mismatched: usize },

    /// Files that could not be read; each one is already reported.
    #[error("{count} file(s) could not be read")]
    Unreadable { count: usize },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Codec { .. } => ExitCode::ParseError,
            Self::CheckFailed { failed, .. } if *failed > 0 => ExitCode::ParseError,
            Self::CheckFailed { .. } => ExitCode::NotCanonical,
            Self::Config { .. } | Self::NoInstallFiles { .. } | Self::RequiresConfirmation => {
                ExitCode::InvalidArguments
            }
            Self::Io { .. } | Self::Unreadable { .. } | Self::Cancelled | Self::Other(_) => {
                ExitCode::GeneralError
            }
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Codec { error, file, .. } => {
                let kind = if error.is_malformed() {
                    "malformed_input"
                } else {
                    "invalid_structure"
                };
                serde_json::json!({
                    "error": kind,
                    "file": file.display().to_string(),
                    "message": error.to_string(),
                    "span": { "start": error.span().start, "end": error.span().end },
                })
            }
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            Self::CheckFailed { failed, mismatched } => serde_json::json!({
                "error": "check_failed",
                "failed": failed,
                "mismatched": mismatched,
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
