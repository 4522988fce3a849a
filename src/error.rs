// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the yacurl client
//!
//! Transport failures surface as `Err`, never as panics. Unknown
//! configuration keys are not errors at all: they are logged and ignored
//! at the merge boundary.

use thiserror::Error;

/// Result type alias for yacurl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the yacurl client
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cookie handling error
    #[error("Cookie error: {0}")]
    Cookie(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a cookie error
    pub fn cookie<S: Into<String>>(msg: S) -> Self {
        Error::Cookie(msg.into())
    }

    /// Check if this is a transport-level failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}
