use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Network-level failures raised by an [`HttpTransport`](crate::port::outbound::transport::HttpTransport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request could not be sent: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether the failure is worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}

/// Completion provider failures.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider unreachable after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Dataset loading and writing errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to read CSV with separator {separator:?}: {reason}")]
    Unreadable { separator: Option<char>, reason: String },

    #[error("{role} column '{column}' does not exist; available columns: {available:?}")]
    MissingColumn {
        role: &'static str,
        column: String,
        available: Vec<String>,
    },

    #[error("unsupported encoding '{0}' (expected utf-8-sig, utf-8 or latin-1)")]
    UnsupportedEncoding(String),

    #[error("failed to write output CSV: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Provider(ProviderError::Transport(err))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_connection_failures_are_retryable() {
        assert!(TransportError::Timeout("90s".into()).is_retryable());
        assert!(TransportError::Connection("reset".into()).is_retryable());
        assert!(!TransportError::Request("bad header".into()).is_retryable());
    }

    #[test]
    fn exhausted_retries_mention_attempts_and_cause() {
        let err = ProviderError::RetriesExhausted {
            attempts: 4,
            last: "HTTP 503".into(),
        };
        let text = err.to_string();
        assert!(text.contains('4'));
        assert!(text.contains("HTTP 503"));
    }

    #[test]
    fn missing_column_lists_available_columns() {
        let err = DatasetError::MissingColumn {
            role: "text",
            column: "body".into(),
            available: vec!["id".into(), "texto".into()],
        };
        let text = err.to_string();
        assert!(text.contains("body"));
        assert!(text.contains("texto"));
    }
}
