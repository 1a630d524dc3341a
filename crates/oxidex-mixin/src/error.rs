//! Error types for the `oxidex-mixin` runtime.
//!
//! Composition itself has a single failure mode, [`Error::InvalidMixinKind`].
//! The remaining variants come from the object model that composed classes
//! and their instances live in (calling, reading and assigning members).

use std::fmt;

/// Errors that can occur while composing classes or using their instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mixin was neither a function nor a declarative specification.
    InvalidMixinKind {
        /// Kind of the rejected value (e.g. `"number"`).
        kind: &'static str,
    },

    /// A member was called but does not hold a function.
    NotCallable {
        /// Name of the member.
        name: String,
    },

    /// A value or receiver had the wrong kind.
    TypeMismatch {
        /// Expected kind.
        expected: &'static str,
        /// Actual kind.
        got: &'static str,
    },

    /// Assignment to a getter-only accessor or a non-writable data member.
    ReadOnlyMember {
        /// Name of the member.
        name: String,
    },

    /// Attempt to replace a member whose descriptor is not configurable.
    NonConfigurableMember {
        /// Name of the member.
        name: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidMixinKind { kind } => {
                write!(f, "{kind}s are not mixins")
            }
            Error::NotCallable { name } => {
                write!(f, "Member '{name}' is not a function")
            }
            Error::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {expected}, got {got}")
            }
            Error::ReadOnlyMember { name } => {
                write!(f, "Cannot assign to read-only member '{name}'")
            }
            Error::NonConfigurableMember { name } => {
                write!(f, "Cannot redefine non-configurable member '{name}'")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for `oxidex-mixin` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", Error::InvalidMixinKind { kind: "number" }),
            "numbers are not mixins"
        );
        assert_eq!(
            format!(
                "{}",
                Error::TypeMismatch {
                    expected: "class",
                    got: "string"
                }
            ),
            "Type mismatch: expected class, got string"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            Error::InvalidMixinKind { kind: "string" },
            Error::InvalidMixinKind { kind: "string" }
        );
        assert_ne!(
            Error::ReadOnlyMember { name: "a".into() },
            Error::NonConfigurableMember { name: "a".into() }
        );
    }
}
