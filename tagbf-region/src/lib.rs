//! Region-Archive: a 4096-byte sector-addressed container for up to 1024
//! TBF documents, indexed by chunk coordinate `(x, z) in [0, 32)`.
//!
//! [`RegionArchive`] eagerly materializes every populated chunk on
//! [`RegionArchive::load`]. [`LazyRegionArchive`] keeps only the header
//! tables and decodes chunks on demand, caching the result. The [`bulk`]
//! module batches either mode across many files with a bounded worker
//! pool.

mod archive;
mod blob;
pub mod bulk;
pub mod error;
mod lazy;
mod sector;

pub use archive::{normalize, ChunkEntry, RegionArchive};
pub use bulk::{load_many, process_directory, save_many, DEFAULT_FILE_CONCURRENCY};
pub use error::{ChunkDiagnostic, Error, FileDiagnostic, Result};
pub use lazy::{LazyRegionArchive, DEFAULT_CHUNK_CONCURRENCY};
pub use sector::{Compression, Location, SECTOR_SIZE, SLOT_COUNT};

#[cfg(test)]
mod tests;
