//! Error types for the gateway module.

use thiserror::Error;

/// Errors raised while running commands on the game server or clients.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The remote shell binary could not be found.
    #[error("Remote shell not found: {command}")]
    ShellNotFound { command: String },

    /// The remote command did not finish in time.
    #[error("Remote command timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The remote command exited unsuccessfully.
    #[error("Remote command failed (exit code {code:?}): {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    /// Volume outside 0-100.
    #[error("Invalid volume {0}, expected 0-100")]
    InvalidVolume(u8),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ShellNotFound { .. } => "shell_not_found",
            Self::Timeout { .. } => "timeout",
            Self::CommandFailed { .. } => "command_failed",
            Self::InvalidVolume(_) => "invalid_volume",
            Self::Io(_) => "io",
        }
    }
}
