//! Resolution errors.

use thiserror::Error;

use crate::node::Node;
use crate::path::PathSource;
use crate::style::Style;

/// Result type for style operations.
pub type Result<T, E = StyleError> = std::result::Result<T, E>;

/// Error returned when a style cannot be read.
#[derive(Debug, Clone, Error)]
pub enum StyleError {
    /// A path did not resolve, or resolved to a payload of another type.
    #[error("could not resolve reference: [{}]. In node: {node}", .path.join(", "))]
    ReferenceNotFound {
        /// Raw path arguments, before tokenization.
        path: Vec<String>,
        /// The node the search started from.
        node: Node,
        #[source]
        cause: Option<TypeMismatch>,
    },

    /// A reference was registered under its own name, but that name is not a
    /// single key.
    #[error("{reason}. Provided reference: {reference}")]
    InvalidReferenceName {
        reason: &'static str,
        reference: Style,
    },

    /// Following references nested deeper than the configured limit.
    #[error("reference {reference} exceeded the maximum reference depth of {limit}")]
    ReferenceDepthExceeded { reference: Style, limit: usize },
}

/// A typed read found a payload of another type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resolved value is not a `{expected}`")]
pub struct TypeMismatch {
    pub expected: &'static str,
}

impl StyleError {
    pub(crate) fn not_found<P: PathSource + ?Sized>(path: &P, node: &Node) -> Self {
        StyleError::ReferenceNotFound {
            path: path.raw_strings(),
            node: node.clone(),
            cause: None,
        }
    }

    pub(crate) fn type_mismatch<T, P: PathSource + ?Sized>(path: &P, node: &Node) -> Self {
        StyleError::ReferenceNotFound {
            path: path.raw_strings(),
            node: node.clone(),
            cause: Some(TypeMismatch {
                expected: std::any::type_name::<T>(),
            }),
        }
    }

    pub(crate) fn unnamed(reference: &Style) -> Self {
        StyleError::InvalidReferenceName {
            reason: "Reference does not have a name",
            reference: reference.clone(),
        }
    }

    pub(crate) fn dotted_name(reference: &Style) -> Self {
        StyleError::InvalidReferenceName {
            reason: "To set a value, a reference should have a single key ('foo' not 'foo.bar')",
            reference: reference.clone(),
        }
    }

    /// Returns `true` for [`StyleError::ReferenceNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StyleError::ReferenceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{reference, value};

    #[test]
    fn test_not_found_display() {
        let node = Node::root(value(1));
        let err = StyleError::not_found(&("colors", "primary"), &node);
        let msg = err.to_string();
        assert!(msg.contains("[colors, primary]"));
        assert!(msg.contains("Node(1)"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_type_mismatch_is_not_found_with_cause() {
        let node = Node::root(value(1));
        let err = StyleError::type_mismatch::<String, _>("a", &node);
        match &err {
            StyleError::ReferenceNotFound { cause, .. } => {
                let expected = cause.as_ref().map(|c| c.expected).unwrap_or_default();
                assert!(expected.ends_with("String"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_name_display() {
        let err = StyleError::dotted_name(&reference("a.b"));
        let msg = err.to_string();
        assert!(msg.contains("'foo' not 'foo.bar'"));
        assert!(msg.contains("SelfReference(a.b)"));
    }
}
