//! All error types for the tmcodec crate.
//!
//! These are returned from every fallible operation (loading, saving,
//! importing, exporting, searching).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("malformed document: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a new malformed-document error.
    pub fn format_error(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }

    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Whether the document could not be parsed as the expected structure.
    ///
    /// Lets callers tell "file unparsable" apart from "file absent"
    /// ([`Error::Io`]) and "empty but valid" (`Ok` with no units).
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::XmlParse(_) | Error::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("docx".to_string());
        assert_eq!(error.to_string(), "unknown format `docx`");
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
        assert!(!error.is_format_error());
    }

    #[test]
    fn test_format_error() {
        let error = Error::format_error("unclosed element <tu>");
        assert_eq!(error.to_string(), "malformed document: unclosed element <tu>");
        assert!(error.is_format_error());
    }

    #[test]
    fn test_configuration_error() {
        let error = Error::Configuration("no destination path".to_string());
        assert_eq!(
            error.to_string(),
            "configuration error: no destination path"
        );
        assert!(!error.is_format_error());
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation_error("threshold out of range");
        assert_eq!(error.to_string(), "validation error: threshold out of range");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnsupportedFormat("xyz".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnsupportedFormat"));
        assert!(debug.contains("xyz"));
    }
}
