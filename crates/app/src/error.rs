//! Driver-level errors.

use crate::script::ScriptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Script could not be parsed
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Core operation refused its input
    #[error("line {line}: {source}")]
    Core {
        line: usize,
        #[source]
        source: huffroute_core::Error,
    },

    /// An encode ran before any capacity was configured
    #[error("line {line}: `encode` before any capacity was set")]
    CapacityNotSet { line: usize },

    /// Script file or stdout I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
