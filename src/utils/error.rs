//! Error types for the EchoPlayer core
//!
//! This module defines the custom error types used throughout the crate.
//! We use thiserror for convenient error type definitions. Note that the
//! orchestrator's intent surface never returns these errors to the caller;
//! failures there are logged and absorbed (see the orchestrator module docs).

use thiserror::Error;

/// Main error type for the EchoPlayer core
#[derive(Error, Debug)]
pub enum EchoPlayerError {
    /// Subtitle parsing errors
    #[error("Subtitle error: {0}")]
    Subtitle(String),

    /// Settings load/store errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// Playback errors reported by a video controller
    #[error("Playback error: {0}")]
    Playback(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error for unexpected situations
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EchoPlayerError {
    /// Create a subtitle error from string
    pub fn subtitle_error<S: Into<String>>(msg: S) -> Self {
        EchoPlayerError::Subtitle(msg.into())
    }

    /// Create a playback error from string
    pub fn playback_error<S: Into<String>>(msg: S) -> Self {
        EchoPlayerError::Playback(msg.into())
    }
}

/// Convenience type alias for Results in the EchoPlayer core
pub type Result<T> = std::result::Result<T, EchoPlayerError>;

/// Extension trait for converting other errors to EchoPlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a subtitle error with the given context
    fn subtitle_err(self, context: &str) -> Result<T>;
    fn settings_err(self, context: &str) -> Result<T>;
    fn playback_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn subtitle_err(self, context: &str) -> Result<T> {
        self.map_err(|e| EchoPlayerError::Subtitle(format!("{}: {}", context, e)))
    }

    fn settings_err(self, context: &str) -> Result<T> {
        self.map_err(|e| EchoPlayerError::Settings(format!("{}: {}", context, e)))
    }

    fn playback_err(self, context: &str) -> Result<T> {
        self.map_err(|e| EchoPlayerError::Playback(format!("{}: {}", context, e)))
    }
}
