//! Per-unit driver errors

use std::path::PathBuf;
use thiserror::Error;
use ufc_ir_lower::LoweringError;

/// Why a single compilation unit could not be lowered
#[derive(Debug, Error)]
pub enum UnitError {
    /// No registered frontend handles the file extension
    #[error("no frontend registered for {}", .path.display())]
    NoFrontend {
        /// Unit path
        path: PathBuf,
    },

    /// The unit could not be read
    #[error("failed to read {}", .path.display())]
    Io {
        /// Unit path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The frontend rejected the source
    #[error("{frontend} frontend failed to parse {}: {message}", .path.display())]
    Parse {
        /// Unit path
        path: PathBuf,
        /// Language of the frontend that failed
        frontend: String,
        /// Frontend error, with its context chain
        message: String,
    },

    /// The frontend panicked while parsing
    #[error("{frontend} frontend panicked on {}: {message}", .path.display())]
    FrontendPanic {
        /// Unit path
        path: PathBuf,
        /// Language of the frontend that panicked
        frontend: String,
        /// Panic payload, when it is a string
        message: String,
    },

    /// The IAST could not be lowered
    #[error("failed to lower {}", .path.display())]
    Lowering {
        /// Unit path
        path: PathBuf,
        /// Underlying error
        source: LoweringError,
    },
}

impl UnitError {
    /// Path of the unit that failed
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NoFrontend { path }
            | Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::FrontendPanic { path, .. }
            | Self::Lowering { path, .. } => path,
        }
    }
}
