//! Error type shared by the STF parser/emitter and the JSON-view codec.

use thiserror::Error;

/// Errors produced while parsing or emitting STF text, or ingesting/viewing
/// a [`tagbf::Document`] as JSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// STF input could not be parsed. `position` is a byte offset into the
    /// original input.
    #[error("stf parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset of the failure.
        position: usize,
        /// Human-readable description of what was expected.
        message: String,
    },

    /// Trailing, unparsed input remained after a complete value was read.
    #[error("trailing input at byte {position}")]
    TrailingInput {
        /// Byte offset where parsing stopped.
        position: usize,
    },

    /// A JSON value did not have the shape a tag ingest requires (e.g. an
    /// explicit `type` field naming something other than a string, or a
    /// `"type": "compound"` node whose `value` was not a JSON object).
    #[error("invalid json-view node: {0}")]
    InvalidJson(String),

    /// An explicit `type` field named something outside the twelve tag
    /// variants.
    #[error("unknown json-view type: {0}")]
    UnknownType(String),

    /// A tag-tree error surfaced while building or inspecting a [`tagbf::Tag`]
    /// (list type mismatches, numeric range failures, etc).
    #[error(transparent)]
    Tag(#[from] tagbf::Error),
}

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
