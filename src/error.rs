//! Error types for breathe.

use thiserror::Error;

/// Errors that can occur anywhere in breathe.
#[derive(Debug, Error)]
pub enum BreatheError {
    /// Input rejected before it could reach the sequencer or storage.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Configuration could not be read, parsed, or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `SQLite` operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A preset, session, or other named item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The terminal could not be set up, drawn, or read.
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for BreatheError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = BreatheError::Validation("preset has no phases".to_string());
        assert_eq!(err.to_string(), "Invalid input: preset has no phases");

        let err = BreatheError::NotFound("preset 'nope'".to_string());
        assert_eq!(err.to_string(), "Not found: preset 'nope'");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BreatheError = io.into();
        assert!(matches!(err, BreatheError::Io(_)));
    }
}
