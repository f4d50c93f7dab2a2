//! Error and diagnostic types for the Region-Archive codec.

use thiserror::Error;

/// Errors produced while decoding or encoding a Region-Archive container.
/// Per-chunk decode failures are *not* represented here — see
/// [`ChunkDiagnostic`] — since a malformed chunk must not abort the rest
/// of the archive (§7).
#[derive(Error, Debug)]
pub enum Error {
    /// A location-table entry pointed at a sector outside the file, or a
    /// chunk's sector count didn't fit in the space between it and the
    /// next populated sector.
    #[error("sector {sector} out of range (file has {available} sectors)")]
    SectorOutOfRange {
        /// The offending sector index.
        sector: u32,
        /// The number of sectors available in the underlying byte source.
        available: u32,
    },

    /// A chunk blob's compression byte was not one of 1 (gzip), 2 (zlib),
    /// or 3 (none).
    #[error("unknown chunk compression scheme: {0}")]
    InvalidCompression(u8),

    /// A chunk blob's `payload_length` header field was too small to even
    /// cover its own compression byte (corrupt or truncated header).
    #[error("invalid chunk payload length: {0}")]
    InvalidPayloadLength(u32),

    /// `(x, z)` fell outside `[0, 32)` after normalization (should be
    /// unreachable — callers get automatic wraparound, §4.D).
    #[error("coordinate ({0}, {1}) out of range")]
    CoordinateOutOfRange(u8, u8),

    /// The inner TBF codec failed to parse or emit a chunk document.
    #[error(transparent)]
    Tag(#[from] tagbf::Error),

    /// The JSON-view codec failed while importing or exporting a chunk.
    #[error(transparent)]
    Text(#[from] tagbf_text::Error),

    /// Wraps an underlying filesystem or stream I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A per-chunk decode failure recorded during an eager [`crate::RegionArchive::load`]
/// instead of aborting the whole file (§7).
#[derive(Debug, Clone)]
pub struct ChunkDiagnostic {
    /// Chunk x-coordinate, `0..32`.
    pub x: u8,
    /// Chunk z-coordinate, `0..32`.
    pub z: u8,
    /// Human-readable description of the failure.
    pub cause: String,
}

/// A per-file failure recorded during a bulk operation instead of aborting
/// the batch (§7).
#[derive(Debug, Clone)]
pub struct FileDiagnostic {
    /// The path that failed to process.
    pub path: std::path::PathBuf,
    /// Human-readable description of the failure.
    pub cause: String,
}
