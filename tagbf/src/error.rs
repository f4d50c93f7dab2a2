//! Error and diagnostic types shared by the TBF codec and the path editor.

use thiserror::Error;

/// Errors produced while decoding, encoding, or editing a [`crate::Document`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Fewer bytes remained in the input than the current field requires.
    #[error("truncated input: needed {needed} more byte(s)")]
    Truncated {
        /// How many additional bytes the field needed.
        needed: usize,
    },

    /// A variant id outside `0..=12` was encountered on the wire.
    #[error("unknown tag variant id: {0}")]
    UnknownVariant(u8),

    /// String bytes were not valid modified UTF-8.
    #[error("invalid modified-utf8 string")]
    InvalidString,

    /// A numeric payload did not fit the range of its declared variant.
    #[error("value {value} is out of range for {variant}")]
    NumericOutOfRange {
        /// The name of the variant whose range was violated.
        variant: &'static str,
        /// The out-of-range value, printed for diagnostics.
        value: String,
    },

    /// A path segment did not resolve to an existing, addressable tag.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A numeric path segment addressed a list index outside its bounds.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The length of the list being indexed.
        len: usize,
    },

    /// A value did not have the type the operation required.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The variant name expected by the caller.
        expected: &'static str,
        /// The variant name actually found.
        found: &'static str,
    },

    /// A list was built from values that do not share one element-variant.
    #[error("list type mismatch: expected {expected}, found {found} at index {index}")]
    ListTypeMismatch {
        /// The element-variant established by the list (usually its first item).
        expected: &'static str,
        /// The variant of the offending item.
        found: &'static str,
        /// The index of the offending item.
        index: usize,
    },

    /// Wraps an underlying filesystem or stream I/O failure.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A single read-only finding produced by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Dot-separated path to the offending tag, empty for the document root.
    pub path: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
