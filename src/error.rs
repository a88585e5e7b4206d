//! Error types for the digest toolkit
//!
//! This module provides the error handling system using `thiserror`
//! for automatic error trait implementations.

use thiserror::Error;

/// Main error type for the digest toolkit
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration: unsupported bit length, empty recipe,
    /// zero-length nonce, malformed challenge target
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the configuration
        message: String,
    },

    /// A nonce splice would reach past the end of the data buffer
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes the operation required
        needed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// The nonce region wrapped back to all zeros without satisfying
    /// the challenge
    #[error("Nonce space exhausted: {nonce_length}-byte nonce wrapped to zero")]
    NonceSpaceExhausted {
        /// Width of the exhausted nonce region in bytes
        nonce_length: usize,
    },

    /// The message source reported a read failure
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the digest toolkit
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a buffer-too-small error
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Create a nonce-space-exhausted error
    pub fn nonce_space_exhausted(nonce_length: usize) -> Self {
        Self::NonceSpaceExhausted { nonce_length }
    }

    /// Get the error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidConfig { .. } => "configuration",
            Error::BufferTooSmall { .. } => "validation",
            Error::NonceSpaceExhausted { .. } => "search",
            Error::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_config("empty recipe");
        assert!(err.to_string().contains("Invalid configuration: empty recipe"));

        let err = Error::buffer_too_small(8, 4);
        assert!(err.to_string().contains("need 8 bytes, have 4"));

        let err = Error::nonce_space_exhausted(4);
        assert!(err.to_string().contains("4-byte nonce wrapped to zero"));
    }

    #[test]
    fn test_error_conversions() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(Error::invalid_config("x").category(), "configuration");
        assert_eq!(Error::buffer_too_small(1, 0).category(), "validation");
        assert_eq!(Error::nonce_space_exhausted(1).category(), "search");
    }
}
