//! The eager, in-memory Region-Archive (§4.D): parses every populated
//! chunk slot up front and keeps the whole tree in a `(x, z)`-keyed,
//! insertion-ordered map. [`crate::lazy::LazyRegionArchive`] is the
//! materialize-on-demand sibling.

use std::io::{Read, Seek, SeekFrom, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use indexmap::IndexMap;
use log::{trace, warn};

use tagbf::{Document, Tag};

use crate::blob::{compress_zlib, decompress};
use crate::error::{ChunkDiagnostic, Error, Result};
use crate::sector::{
    self, Compression, Location, BLOB_HEADER_SIZE, FIRST_DATA_SECTOR, SECTOR_SIZE, SLOT_COUNT,
};

/// A stored chunk plus the timestamp that `save` will write for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkEntry {
    pub document: Document,
    pub timestamp: u32,
}

/// Normalizes a possibly out-of-range or negative chunk coordinate into
/// `[0, 32)` (§4.D "coordinate normalization" — a deliberate container
/// affordance, property 8 in §8).
pub fn normalize(x: i32, z: i32) -> (u8, u8) {
    (x.rem_euclid(32) as u8, z.rem_euclid(32) as u8)
}

fn now_unix() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// The eager, fully-materialized Region-Archive.
#[derive(Debug, Clone, Default)]
pub struct RegionArchive {
    chunks: IndexMap<(u8, u8), ChunkEntry>,
    diagnostics: Vec<ChunkDiagnostic>,
}

impl RegionArchive {
    /// An archive with no stored chunks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses every populated slot in `reader` up front. Per-chunk decode
    /// failures are recorded as diagnostics and do not abort the rest of
    /// the file (§7).
    pub fn load<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let total_sectors = total_sectors(&mut reader)?;
        reader.seek(SeekFrom::Start(0))?;
        let location_table = sector::read_location_table(&mut reader)?;
        let timestamp_table = sector::read_timestamp_table(&mut reader)?;

        let mut archive = Self::empty();
        for z in 0..32u8 {
            for x in 0..32u8 {
                let slot = sector::slot_index(x, z);
                let Some(location) = location_table[slot] else {
                    continue;
                };
                trace!("reading chunk ({x}, {z}) at sector {}", location.sector_offset);
                match read_chunk_blob(&mut reader, location, total_sectors) {
                    Ok(document) => {
                        archive.chunks.insert(
                            (x, z),
                            ChunkEntry {
                                document,
                                timestamp: timestamp_table[slot],
                            },
                        );
                    }
                    Err(e) => {
                        warn!("skipping unreadable chunk ({x}, {z}): {e}");
                        archive.diagnostics.push(ChunkDiagnostic {
                            x,
                            z,
                            cause: e.to_string(),
                        });
                    }
                }
            }
        }
        Ok(archive)
    }

    /// Linearizes stored chunks into sector order by the archive's
    /// iteration (insertion) order, not `(x, z)` order — this is the
    /// resolved Open Question 1 and is observable (§8 property 6, §9).
    pub fn save<W: Write + Seek>(&self, mut writer: W) -> Result<()> {
        writer.seek(SeekFrom::Start(0))?;
        writer.write_all(&[0u8; SECTOR_SIZE * 2])?;

        let mut location_table: [Option<Location>; SLOT_COUNT] = [None; SLOT_COUNT];
        let mut timestamp_table = [0u32; SLOT_COUNT];
        let mut next_sector = FIRST_DATA_SECTOR;

        for (&(x, z), entry) in &self.chunks {
            let bytes = tagbf::write_bytes(&entry.document)?;
            let compressed = compress_zlib(&bytes)?;
            let payload_length = (compressed.len() + 1) as u32;
            let sector_count = sector::sectors_for_payload(payload_length);

            let slot = sector::slot_index(x, z);
            location_table[slot] = Some(Location {
                sector_offset: next_sector,
                sector_count,
            });
            timestamp_table[slot] = entry.timestamp;

            writer.seek(SeekFrom::Start(next_sector as u64 * SECTOR_SIZE as u64))?;
            writer.write_u32::<BigEndian>(payload_length)?;
            writer.write_u8(Compression::Zlib.to_byte())?;
            writer.write_all(&compressed)?;

            let written = BLOB_HEADER_SIZE + compressed.len();
            let padded = sector_count as usize * SECTOR_SIZE;
            writer.write_all(&vec![0u8; padded - written])?;

            next_sector += sector_count as u32;
        }

        writer.seek(SeekFrom::Start(0))?;
        sector::write_location_table(&mut writer, &location_table)?;
        sector::write_timestamp_table(&mut writer, &timestamp_table)?;
        Ok(())
    }

    /// The chunk at `(x, z)`, after coordinate normalization (§8 property 8).
    pub fn get_chunk(&self, x: i32, z: i32) -> Option<&Document> {
        let key = normalize(x, z);
        self.chunks.get(&key).map(|e| &e.document)
    }

    /// Stores `document` at `(x, z)` (normalized) and stamps the current
    /// wall-clock time.
    pub fn set_chunk(&mut self, x: i32, z: i32, document: Document) {
        let key = normalize(x, z);
        self.chunks.insert(
            key,
            ChunkEntry {
                document,
                timestamp: now_unix(),
            },
        );
    }

    /// Removes and returns the chunk at `(x, z)` (normalized), if any.
    pub fn remove_chunk(&mut self, x: i32, z: i32) -> Option<Document> {
        let key = normalize(x, z);
        self.chunks.shift_remove(&key).map(|e| e.document)
    }

    /// The timestamp recorded for `(x, z)` (normalized), if the slot is
    /// populated.
    pub fn timestamp(&self, x: i32, z: i32) -> Option<u32> {
        let key = normalize(x, z);
        self.chunks.get(&key).map(|e| e.timestamp)
    }

    /// All stored chunks, in iteration (insertion) order.
    pub fn all_chunks(&self) -> impl Iterator<Item = ((u8, u8), &Document)> {
        self.chunks.iter().map(|(&k, e)| (k, &e.document))
    }

    /// The valid chunk-coordinate domain this archive addresses:
    /// `(min_x, min_z, max_x, max_z)`, always `(0, 0, 31, 31)`.
    pub fn region_bounds(&self) -> (u8, u8, u8, u8) {
        (0, 0, 31, 31)
    }

    /// Number of populated chunk slots.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Path-addressed read into the chunk at `(x, z)` (§4.C, applied to a
    /// single chunk's document).
    pub fn extract(&self, x: i32, z: i32, path: &str) -> Option<&Tag> {
        tagbf::get(self.get_chunk(x, z)?, path)
    }

    /// Diagnostics accumulated by [`RegionArchive::load`] for chunks that
    /// failed to decode. Empty for an archive built purely via
    /// [`RegionArchive::set_chunk`].
    pub fn diagnostics(&self) -> &[ChunkDiagnostic] {
        &self.diagnostics
    }

    /// Projects every stored chunk through the JSON-view codec (§6),
    /// keyed by `"x,z"`, in iteration order.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut map = serde_json::Map::with_capacity(self.chunks.len());
        for (&(x, z), entry) in &self.chunks {
            map.insert(format!("{x},{z}"), tagbf_text::to_json(&entry.document));
        }
        Ok(serde_json::Value::Object(map))
    }

    /// Rebuilds a [`RegionArchive`] from the `{"x,z": <json-view>}` form
    /// produced by [`RegionArchive::to_json`]. Timestamps are not part of
    /// the JSON view and are stamped with the current wall-clock time.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| tagbf_text::Error::InvalidJson("expected a JSON object".into()))?;
        let mut archive = Self::empty();
        for (key, chunk_value) in object {
            let (x, z) = parse_coordinate_key(key)?;
            let document = tagbf_text::from_json(chunk_value.clone())?;
            archive.set_chunk(x as i32, z as i32, document);
        }
        Ok(archive)
    }
}

fn parse_coordinate_key(key: &str) -> Result<(u8, u8)> {
    let (x, z) = key
        .split_once(',')
        .ok_or_else(|| tagbf_text::Error::InvalidJson(format!("malformed chunk key {key:?}")))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u8>()
            .map_err(|_| tagbf_text::Error::InvalidJson(format!("malformed chunk key {key:?}")))
    };
    Ok((parse(x)?, parse(z)?))
}

/// Total number of whole sectors in `reader`'s underlying byte source, used
/// to bounds-check a location-table entry before trusting it to seek.
fn total_sectors<R: Seek>(reader: &mut R) -> Result<u32> {
    let len = reader.seek(SeekFrom::End(0))?;
    Ok((len / SECTOR_SIZE as u64) as u32)
}

fn read_chunk_blob<R: Read + Seek>(
    reader: &mut R,
    location: Location,
    total_sectors: u32,
) -> Result<Document> {
    let end_sector = location.sector_offset as u64 + location.sector_count as u64;
    if end_sector > total_sectors as u64 {
        return Err(Error::SectorOutOfRange {
            sector: location.sector_offset,
            available: total_sectors,
        });
    }
    reader.seek(SeekFrom::Start(
        location.sector_offset as u64 * SECTOR_SIZE as u64,
    ))?;
    let payload_length = reader.read_u32::<BigEndian>()?;
    if payload_length < 1 {
        return Err(Error::InvalidPayloadLength(payload_length));
    }
    let compression = Compression::from_byte(reader.read_u8()?)?;
    let mut buf = vec![0u8; payload_length as usize - 1];
    reader.read_exact(&mut buf)?;
    let bytes = decompress(&buf, compression)?;
    Ok(tagbf::read_bytes(&bytes)?)
}
