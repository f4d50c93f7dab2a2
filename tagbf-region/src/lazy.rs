//! The lazy Region-Archive: retains only the two header tables and a
//! handle to the byte source, materializing chunks on first access and
//! caching them (§4.D "lazy mode").

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex};

use byteorder::{BigEndian, ReadBytesExt};
use log::trace;
use rayon::{ThreadPool, ThreadPoolBuilder};

use tagbf::Document;

use crate::archive::normalize;
use crate::blob::decompress;
use crate::error::{Error, Result};
use crate::sector::{self, Compression, Location, SECTOR_SIZE, SLOT_COUNT};

/// Default bound on concurrent per-chunk decode work (§5).
pub const DEFAULT_CHUNK_CONCURRENCY: usize = 10;

/// Holds only the header tables and the byte source; chunks are parsed on
/// first `get_chunk`/`get_chunk_async` and cached afterward.
pub struct LazyRegionArchive<S> {
    source: Mutex<S>,
    location_table: [Option<Location>; SLOT_COUNT],
    timestamp_table: [u32; SLOT_COUNT],
    total_sectors: u32,
    cache: Mutex<HashMap<(u8, u8), Arc<Document>>>,
    pool: ThreadPool,
}

impl<S: Read + Seek + Send> LazyRegionArchive<S> {
    /// Reads the header tables and wraps `source`, without materializing
    /// any chunk bodies.
    pub fn load_lazy(source: S) -> Result<Self> {
        Self::load_lazy_with_concurrency(source, DEFAULT_CHUNK_CONCURRENCY)
    }

    /// As [`Self::load_lazy`], with an explicit bound on concurrent
    /// per-chunk decode work.
    pub fn load_lazy_with_concurrency(mut source: S, max_concurrency: usize) -> Result<Self> {
        source.seek(SeekFrom::Start(0))?;
        let location_table = sector::read_location_table(&mut source)?;
        let timestamp_table = sector::read_timestamp_table(&mut source)?;
        let total_sectors = (source.seek(SeekFrom::End(0))? / SECTOR_SIZE as u64) as u32;
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_concurrency.max(1))
            .build()
            .expect("building the bounded chunk-decode pool");
        Ok(Self {
            source: Mutex::new(source),
            location_table,
            timestamp_table,
            total_sectors,
            cache: Mutex::new(HashMap::new()),
            pool,
        })
    }

    /// The chunk at `(x, z)` (normalized), materializing and caching it on
    /// first access.
    pub fn get_chunk(&self, x: i32, z: i32) -> Result<Option<Arc<Document>>> {
        let (x, z) = normalize(x, z);
        if let Some(doc) = self.cache.lock().expect("cache lock poisoned").get(&(x, z)) {
            return Ok(Some(doc.clone()));
        }
        let slot = sector::slot_index(x, z);
        let Some(location) = self.location_table[slot] else {
            return Ok(None);
        };
        let end_sector = location.sector_offset as u64 + location.sector_count as u64;
        if end_sector > self.total_sectors as u64 {
            return Err(Error::SectorOutOfRange {
                sector: location.sector_offset,
                available: self.total_sectors,
            });
        }
        trace!("materializing chunk ({x}, {z})");
        let bytes = self.read_blob(location)?;
        let document = Arc::new(tagbf::read_bytes(&bytes)?);
        self.cache
            .lock()
            .expect("cache lock poisoned")
            .insert((x, z), document.clone());
        Ok(Some(document))
    }

    /// Submits the decode onto the bounded pool and blocks the caller only
    /// at the join point (§5's "bounded worker pool" scheduling model).
    /// Concurrent calls for distinct coordinates are safe; the contract
    /// makes no promises for concurrent calls on the same coordinate with
    /// a racing `set_chunk`.
    pub fn get_chunk_async(&self, x: i32, z: i32) -> Result<Option<Arc<Document>>> {
        self.pool.install(|| self.get_chunk(x, z))
    }

    /// Drops every cached chunk; the byte source and header tables remain.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("cache lock poisoned").clear();
    }

    /// The timestamp recorded for `(x, z)` (normalized), if the slot is
    /// populated.
    pub fn timestamp(&self, x: i32, z: i32) -> Option<u32> {
        let (x, z) = normalize(x, z);
        let slot = sector::slot_index(x, z);
        self.location_table[slot].map(|_| self.timestamp_table[slot])
    }

    fn read_blob(&self, location: Location) -> Result<Vec<u8>> {
        let mut source = self.source.lock().expect("source lock poisoned");
        source.seek(SeekFrom::Start(
            location.sector_offset as u64 * SECTOR_SIZE as u64,
        ))?;
        let payload_length = source.read_u32::<BigEndian>()?;
        if payload_length < 1 {
            return Err(Error::InvalidPayloadLength(payload_length));
        }
        let compression = Compression::from_byte(source.read_u8()?)?;
        let mut buf = vec![0u8; payload_length as usize - 1];
        source.read_exact(&mut buf)?;
        drop(source);
        decompress(&buf, compression)
    }
}
