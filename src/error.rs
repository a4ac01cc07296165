//! Error types and handling for the kitecast service

use thiserror::Error;

/// Main error type for the kitecast service
#[derive(Error, Debug)]
pub enum KitecastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Outbound API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Spot catalog could not be loaded or is inconsistent
    #[error("Spot catalog error: {message}")]
    Catalog { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl KitecastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = KitecastError::config("bad port");
        assert!(matches!(config_err, KitecastError::Config { .. }));

        let catalog_err = KitecastError::catalog("duplicate id");
        assert!(matches!(catalog_err, KitecastError::Catalog { .. }));

        let validation_err = KitecastError::validation("unknown direction");
        assert!(matches!(validation_err, KitecastError::Validation { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KitecastError = io_err.into();
        assert!(matches!(err, KitecastError::Io { .. }));
    }
}
