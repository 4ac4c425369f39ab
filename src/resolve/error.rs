//! Error types for tower resolution

use thiserror::Error;

use crate::dictionary::{DictionaryError, NodeKind};

/// Errors that abort resolution of one flavor
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No region of the flavor carries the record's region index
    #[error("line {line}: no region in group '{group}' has region index '{index}'")]
    UnresolvedRegion {
        group: String,
        index: String,
        line: usize,
    },

    /// More than one region carries the record's region index
    #[error("line {line}: region index '{index}' matches {count} regions in group '{group}'")]
    AmbiguousRegion {
        group: String,
        index: String,
        count: usize,
        line: usize,
    },

    /// A table row does not have the expected shape
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// An index lies outside the region's declared range
    #[error("line {line}: {field} index {index} outside {expected} of region '{region}'")]
    IndexOutOfRange {
        field: String,
        index: i64,
        expected: String,
        region: String,
        line: usize,
    },

    /// The sampling layer is not a label of the sampling field
    #[error("line {line}: sampling {sampling} is not declared by field '{field}'")]
    UnknownSampling {
        field: String,
        sampling: i64,
        line: usize,
    },

    /// The region references other subregions but not the flavor's
    #[error("line {line}: region '{region}' does not reference subregion '{subregion}'")]
    SubregionMismatch {
        region: String,
        subregion: String,
        line: usize,
    },

    /// A definition the flavor depends on is absent from the dictionary
    #[error("dictionary has no <{kind}> named '{name}'")]
    MissingDefinition { kind: NodeKind, name: String },

    /// A region used for resolution is itself malformed
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// Index table could not be read
    #[error("failed to read index table: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    /// Create an unresolved region error
    pub fn unresolved(group: impl Into<String>, index: impl Into<String>, line: usize) -> Self {
        Self::UnresolvedRegion {
            group: group.into(),
            index: index.into(),
            line,
        }
    }

    /// Create a malformed record error
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a missing definition error
    pub fn missing_definition(kind: NodeKind, name: impl Into<String>) -> Self {
        Self::MissingDefinition {
            kind,
            name: name.into(),
        }
    }

    /// Table line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnresolvedRegion { line, .. }
            | Self::AmbiguousRegion { line, .. }
            | Self::MalformedRecord { line, .. }
            | Self::IndexOutOfRange { line, .. }
            | Self::UnknownSampling { line, .. }
            | Self::SubregionMismatch { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_display() {
        let err = ResolveError::unresolved("Reg_GTower", "99", 4);
        assert_eq!(
            err.to_string(),
            "line 4: no region in group 'Reg_GTower' has region index '99'"
        );
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_malformed_display() {
        let err = ResolveError::malformed(2, "expected 6 fields, found 5");
        assert!(err.to_string().contains("expected 6 fields"));
    }

    #[test]
    fn test_missing_definition_display() {
        let err = ResolveError::missing_definition(NodeKind::Field, "JTsampling");
        assert_eq!(err.to_string(), "dictionary has no <field> named 'JTsampling'");
        assert_eq!(err.line(), None);
    }
}
