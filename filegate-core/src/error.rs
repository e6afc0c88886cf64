//! Gateway error kinds and the error type shared across crates

use std::fmt;
use thiserror::Error;

/// Opaque underlying cause (provider SDK error, I/O error, multipart error...)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Closed set of failure categories callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Request parsing
    FormParse,
    FormFieldMissing,

    // Object store
    Upload,
    Delete,
    List,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormParse => "FormParseError",
            Self::FormFieldMissing => "FormFieldMissingError",
            Self::Upload => "UploadError",
            Self::Delete => "DeleteError",
            Self::List => "ListError",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::FormParse | Self::FormFieldMissing => 400,
            Self::Upload | Self::Delete | Self::List => 500,
        }
    }

    /// Whether the failure originated in the object store
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Upload | Self::Delete | Self::List)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carrying a kind, a log-friendly message and the provider cause.
///
/// The cause is only ever written to the server log; HTTP responses are built
/// from the kind alone.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    kind: ErrorKind,
    message: String,
    key: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            key: None,
            source: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn upload(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        let key = key.into();
        Self::new(ErrorKind::Upload, format!("failed to upload file {key}"))
            .with_key(key)
            .with_source(source)
    }

    pub fn delete(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        let key = key.into();
        Self::new(ErrorKind::Delete, format!("failed to delete object {key}"))
            .with_key(key)
            .with_source(source)
    }

    pub fn list(prefix: impl Into<String>, source: impl Into<BoxError>) -> Self {
        let prefix = prefix.into();
        Self::new(
            ErrorKind::List,
            format!("failed to list objects with prefix {prefix:?}"),
        )
        .with_key(prefix)
        .with_source(source)
    }

    pub fn form_parse(source: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::FormParse, "failed to parse form").with_source(source)
    }

    pub fn field_missing(field: &str) -> Self {
        Self::new(
            ErrorKind::FormFieldMissing,
            format!("missing form field {field:?}"),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Key (or prefix) the failed operation was working on
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    /// Underlying causes joined with `": "`, for server-side logs
    pub fn cause_chain(&self) -> String {
        let mut causes = Vec::new();
        let mut next = std::error::Error::source(self);
        while let Some(cause) = next {
            causes.push(cause.to_string());
            next = cause.source();
        }
        causes.join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorKind::FormParse.http_status(), 400);
        assert_eq!(ErrorKind::FormFieldMissing.http_status(), 400);
        assert_eq!(ErrorKind::Upload.http_status(), 500);
        assert_eq!(ErrorKind::Delete.http_status(), 500);
        assert_eq!(ErrorKind::List.http_status(), 500);
    }

    #[test]
    fn test_delete_error_names_key_and_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let error = GatewayError::delete("a/2", cause);

        assert_eq!(error.kind(), ErrorKind::Delete);
        assert_eq!(error.key(), Some("a/2"));
        assert_eq!(error.to_string(), "DeleteError: failed to delete object a/2");
        assert_eq!(error.source().unwrap().to_string(), "connection reset");
        assert_eq!(error.cause_chain(), "connection reset");
    }

    #[test]
    fn test_field_missing_has_no_cause() {
        let error = GatewayError::field_missing("file");
        assert_eq!(error.kind(), ErrorKind::FormFieldMissing);
        assert!(error.source().is_none());
        assert!(error.cause_chain().is_empty());
        assert!(!error.kind().is_storage());
    }
}
