//! Error types for copy operations.
//!
//! Copying is pure and deterministic: every failure is a structural mismatch
//! between the graph and the host's capabilities, never a transient
//! condition, so there is nothing to retry. An error aborts the whole
//! top-level copy; no partial result is returned as valid output.

use std::fmt;

/// An error during a copy operation.
pub struct CopyError {
    pub kind: CopyErrorKind,
}

/// The kind of copy error.
pub enum CopyErrorKind {
    /// Shallow duplication is unavailable for this target (abstract shape,
    /// or an id that does not name a composite instance).
    UnsupportedTarget { shape: Box<str> },
    /// A field descriptor does not apply to the instance it was used on, or
    /// names a field its declaring type does not have.
    FieldAccess {
        declaring: Box<str>,
        index: usize,
        target: Box<str>,
    },
    /// An element accessor was used with a mismatched index tuple, or on a
    /// non-array instance.
    ElementAccess { target: Box<str>, index: Vec<usize> },
}

impl CopyError {
    pub fn unsupported_target(shape: &str) -> Self {
        Self {
            kind: CopyErrorKind::UnsupportedTarget {
                shape: shape.into(),
            },
        }
    }

    pub fn field_access(declaring: &str, index: usize, target: &str) -> Self {
        Self {
            kind: CopyErrorKind::FieldAccess {
                declaring: declaring.into(),
                index,
                target: target.into(),
            },
        }
    }

    pub fn element_access(target: &str, index: &[usize]) -> Self {
        Self {
            kind: CopyErrorKind::ElementAccess {
                target: target.into(),
                index: index.to_vec(),
            },
        }
    }
}

impl fmt::Display for CopyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyErrorKind::UnsupportedTarget { shape } => {
                write!(f, "shallow duplication unsupported for `{shape}`")
            }
            CopyErrorKind::FieldAccess {
                declaring,
                index,
                target,
            } => {
                write!(
                    f,
                    "field {index} of `{declaring}` does not apply to `{target}`"
                )
            }
            CopyErrorKind::ElementAccess { target, index } => {
                write!(f, "element {index:?} out of bounds for `{target}`")
            }
        }
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Debug for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for CopyError {}
