//! Error types for helperbox
//!
//! Every fallible helper returns [`Result`] with a [`HelperError`]. Helpers whose
//! contract is a success flag (CSV writing, archive extraction) log the cause
//! instead and return `false`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for helperbox
#[derive(Error, Debug, Clone)]
pub enum HelperError {
    // Validation errors

    /// A date or date-time string could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The time zone identifier is not in the IANA database
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),

    /// Range step has the wrong sign for the requested direction
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// A row does not carry a field the operation needs
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Refused to delete the running executable
    #[error("Refusing to remove the running executable: {}", .0.display())]
    SelfRemoval(PathBuf),

    // I/O and format errors

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(String),

    /// ZIP archive error
    #[error("Archive error: {0}")]
    Archive(String),

    /// Directory traversal error
    #[error("Directory walk error: {0}")]
    Walk(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Custom error with message
    #[error("{0}")]
    Custom(String),
}

/// Type alias for Results using HelperError
pub type Result<T> = std::result::Result<T, HelperError>;

impl HelperError {
    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        HelperError::Custom(msg.into())
    }

    /// Check if this error came from the file system or an on-disk format
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            HelperError::Io(_) | HelperError::Csv(_) | HelperError::Archive(_) | HelperError::Walk(_)
        )
    }

    /// Check if this error is a rejected input
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            HelperError::InvalidDate(_)
                | HelperError::UnknownTimezone(_)
                | HelperError::InvalidStep(_)
                | HelperError::MissingField(_)
                | HelperError::SelfRemoval(_)
        )
    }
}

impl From<std::io::Error> for HelperError {
    fn from(error: std::io::Error) -> Self {
        HelperError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for HelperError {
    fn from(error: serde_json::Error) -> Self {
        HelperError::Serialization(error.to_string())
    }
}

impl From<csv::Error> for HelperError {
    fn from(error: csv::Error) -> Self {
        HelperError::Csv(error.to_string())
    }
}

impl From<zip::result::ZipError> for HelperError {
    fn from(error: zip::result::ZipError) -> Self {
        HelperError::Archive(error.to_string())
    }
}

impl From<walkdir::Error> for HelperError {
    fn from(error: walkdir::Error) -> Self {
        HelperError::Walk(error.to_string())
    }
}

impl From<chrono::ParseError> for HelperError {
    fn from(error: chrono::ParseError) -> Self {
        HelperError::InvalidDate(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HelperError::InvalidStep("Step must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid step: Step must be positive");

        let err = HelperError::SelfRemoval(PathBuf::from("/usr/bin/app"));
        assert_eq!(
            err.to_string(),
            "Refusing to remove the running executable: /usr/bin/app"
        );

        let err = HelperError::custom("Custom error message");
        assert_eq!(err.to_string(), "Custom error message");
    }

    #[test]
    fn test_error_categories() {
        assert!(HelperError::Io("gone".into()).is_io_error());
        assert!(HelperError::Archive("bad header".into()).is_io_error());
        assert!(!HelperError::Io("gone".into()).is_validation_error());

        assert!(HelperError::InvalidDate("tomorrow-ish".into()).is_validation_error());
        assert!(HelperError::UnknownTimezone("Mars/Base".into()).is_validation_error());
        assert!(!HelperError::Custom("x".into()).is_validation_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: HelperError = io.into();
        assert!(matches!(err, HelperError::Io(ref msg) if msg.contains("no such file")));
    }
}
