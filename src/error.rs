use thiserror::Error;

/// Unified error type for dist-publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Manifest version error: {0}")]
    ManifestVersion(String),

    #[error("Missing commit: {0}")]
    MissingCommit(String),

    #[error("Invalid branch: {0}")]
    InvalidBranch(String),

    #[error("Command '{command}' failed{}: {stderr}", exit_code_suffix(.exit_code))]
    ExternalCommand {
        command: String,
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

/// Convenience type alias for Results in dist-publish
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    /// Create a manifest version error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        PublishError::ManifestVersion(msg.into())
    }

    /// Create a missing commit error with context
    pub fn missing_commit(msg: impl Into<String>) -> Self {
        PublishError::MissingCommit(msg.into())
    }

    /// Create an invalid branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        PublishError::InvalidBranch(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        PublishError::Version(msg.into())
    }

    /// Create an external command error
    pub fn command(
        command: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        PublishError::ExternalCommand {
            command: command.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }
}
