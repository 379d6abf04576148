use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to download {dest}: {source}")]
    Download {
        dest: String,
        #[source]
        source: DownloadFailure,
    },

    #[error("failed to {action} {}: {source}", .path.display())]
    EnvFile {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Esc or Ctrl-C at a prompt.
    #[error("interrupted by the user")]
    Interrupted,

    #[error("failed to start `{bin} compose`: {source}")]
    Launch {
        bin: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single download did not complete.
#[derive(Debug, Error)]
pub enum DownloadFailure {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
