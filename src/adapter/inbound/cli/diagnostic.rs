//! Miette-based error diagnostics for CLI error presentation.
//!
//! Configuration files that fail to parse are shown with the offending
//! region labeled, instead of a bare one-line error.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(triage::config))]
pub struct ConfigDiagnostic {
    /// Human-readable error message.
    pub message: String,

    /// Configuration file content.
    #[source_code]
    pub src: String,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: SourceSpan,

    /// Optional help text with suggestions for fixing the error.
    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Create a new configuration error with source location.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    /// Build a diagnostic from a TOML parse failure over `src`.
    ///
    /// Returns `None` when the parser reported no location.
    #[must_use]
    pub fn from_toml(error: &toml::de::Error, src: &str) -> Option<Self> {
        let span = error.span()?;
        let len = span.end.saturating_sub(span.start).max(1);
        Some(
            Self::new(error.message(), src, span.start, len)
                .with_help("see the [logging], [provider], [retry] and [batch] sections"),
        )
    }

    /// Add a help suggestion to the error.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with miette's graphical handler.
    #[must_use]
    pub fn render(self) -> String {
        format!("{:?}", miette::Report::new(self))
    }
}
