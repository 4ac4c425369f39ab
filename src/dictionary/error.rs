//! Error types for dictionary loading

use thiserror::Error;

use crate::error::{report, ParseError, Span};

use super::types::NodeKind;

/// Errors that can occur while loading a geometry dictionary
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Dictionary file could not be read
    #[error("failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    /// XML syntax errors
    #[error("dictionary syntax errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Tree is well-formed XML but not a usable dictionary
    #[error("malformed dictionary: {reason}")]
    Malformed { reason: String, span: Option<Span> },
}

impl From<Vec<ParseError>> for DictionaryError {
    fn from(errors: Vec<ParseError>) -> Self {
        DictionaryError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl DictionaryError {
    /// Create a malformed dictionary error
    pub fn malformed(reason: impl Into<String>, span: Option<Span>) -> Self {
        Self::Malformed {
            reason: reason.into(),
            span,
        }
    }

    /// A required top-level node kind is absent
    pub fn missing_kind(kind: NodeKind) -> Self {
        Self::malformed(format!("no top-level <{}> nodes", kind), None)
    }

    /// A node lacks a required attribute
    pub fn missing_attribute(kind: NodeKind, attribute: &str, span: Span) -> Self {
        Self::malformed(
            format!("<{}> is missing required attribute '{}'", kind, attribute),
            Some(span),
        )
    }

    /// A numeric attribute does not parse
    pub fn invalid_number(kind: NodeKind, attribute: &str, value: &str, span: Span) -> Self {
        Self::malformed(
            format!(
                "<{}> attribute '{}' has non-numeric value '{}'",
                kind, attribute, value
            ),
            Some(span),
        )
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Parse(errors) => errors.first().map(|e| e.span()),
            Self::Malformed { span, .. } => span.as_ref(),
            Self::Io(_) => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            Self::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Malformed {
                reason,
                span: Some(span),
            } => report(source, filename, span.clone(), "malformed dictionary", reason),
            _ => self.to_string(),
        }
    }
}
