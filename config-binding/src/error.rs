use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::value::ValueKind;

/// A raw value that could not be parsed into the kind its property declares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value '{value}' for property '{key}': expected {expected}, {reason}")]
pub struct ParseError {
    /// Key exactly as it appeared in the input (canonical or alias)
    pub key: String,
    /// Raw, unparsed value
    pub value: String,
    /// Kind the owning property declares
    pub expected: ValueKind,
    /// Parser-specific explanation
    pub reason: String,
}

/// A parsed value (or combination of values) that violates a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration for {}: {message}", quoted_keys(.keys))]
pub struct ValidationError {
    /// Keys involved; a single key for field-level checks
    pub keys: Vec<String>,
    pub message: String,
}

/// One problem found while binding a property map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("Unknown configuration property '{key}'")]
    UnknownKey { key: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "Configuration property '{key}' conflicts with '{conflicting_key}': both set '{canonical_key}'"
    )]
    ConflictingAlias {
        key: String,
        conflicting_key: String,
        canonical_key: &'static str,
    },

    #[error("Defunct configuration property '{key}' cannot be configured")]
    DefunctKey { key: String },
}

impl BindingError {
    /// Primary key this error is reported against.
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownKey { key }
            | Self::ConflictingAlias { key, .. }
            | Self::DefunctKey { key } => key,
            Self::Parse(err) => &err.key,
            Self::Validation(err) => err.keys.first().map(String::as_str).unwrap_or_default(),
        }
    }
}

/// Every problem found by one binding pass, in report order.
///
/// Never empty: the binder only returns it when at least one error was
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingErrors(Vec<BindingError>);

impl BindingErrors {
    pub(crate) fn new(errors: Vec<BindingError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn errors(&self) -> &[BindingError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BindingError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<BindingError> {
        self.0
    }
}

impl fmt::Display for BindingErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration binding failed ({} error{}):",
            self.0.len(),
            if self.0.len() == 1 { "" } else { "s" }
        )?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BindingErrors {}

impl<'a> IntoIterator for &'a BindingErrors {
    type Item = &'a BindingError;
    type IntoIter = std::slice::Iter<'a, BindingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Two descriptors (or a descriptor and a defunct entry) claim the same key.
///
/// This is a bug in the descriptor table, not in operator input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration key '{key}' is claimed by both '{existing}' and '{rejected}'")]
pub struct DuplicateKeyError {
    pub key: &'static str,
    /// Canonical key of the owner that registered first
    pub existing: &'static str,
    /// Canonical key of the descriptor that was rejected
    pub rejected: &'static str,
}

/// Errors while reading a properties source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read properties file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed property on line {line}: '{content}' (expected key=value)")]
    Malformed { line: usize, content: String },

    #[error("Duplicate property '{key}' on line {line}")]
    DuplicateKey { line: usize, key: String },
}

fn quoted_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|k| format!("'{k}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_errors_display_lists_every_error() {
        let errors = BindingErrors::new(vec![
            BindingError::UnknownKey {
                key: "no-such-key".into(),
            },
            BindingError::DefunctKey {
                key: "legacy-timestamp".into(),
            },
        ]);

        assert_eq!(
            errors.to_string(),
            "Configuration binding failed (2 errors):\n  \
             - Unknown configuration property 'no-such-key'\n  \
             - Defunct configuration property 'legacy-timestamp' cannot be configured"
        );
    }

    #[test]
    fn test_single_error_header_is_singular() {
        let errors = BindingErrors::new(vec![BindingError::UnknownKey { key: "x".into() }]);
        assert!(errors.to_string().starts_with("Configuration binding failed (1 error):"));
    }

    #[test]
    fn test_validation_error_names_all_keys() {
        let err = ValidationError {
            keys: vec![
                "memory-revoking-target".into(),
                "memory-revoking-threshold".into(),
            ],
            message: "target exceeds threshold".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'memory-revoking-target', 'memory-revoking-threshold': \
             target exceeds threshold"
        );
    }

    #[test]
    fn test_error_key_accessor() {
        let err = BindingError::ConflictingAlias {
            key: "deprecated.a".into(),
            conflicting_key: "a".into(),
            canonical_key: "a",
        };
        assert_eq!(err.key(), "deprecated.a");
    }
}
