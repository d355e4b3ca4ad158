//! Error types for folio-tui.
//!
//! The visibility and style core never surfaces these: it degrades silently
//! and reports through [`crate::diagnostics`]. Errors here come from parsing
//! caller input, loading configuration and terminal I/O.

use thiserror::Error;

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the absorbed core.
#[derive(Error, Debug)]
pub enum Error {
    /// Root margin string is not valid CSS margin shorthand
    #[error("Invalid root margin '{0}': expected 1-4 lengths in px or %")]
    InvalidRootMargin(String),

    /// Threshold outside [0, 1]
    #[error("Invalid threshold {0}: must be within [0, 1]")]
    InvalidThreshold(f32),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
