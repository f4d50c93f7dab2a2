//! Sector-layout primitives: the 4096-byte allocation unit, the location
//! and timestamp tables, and the chunk blob header (§4.D).

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Size in bytes of one sector.
pub const SECTOR_SIZE: usize = 4096;
/// Number of slots in the location/timestamp tables, `32 * 32`.
pub const SLOT_COUNT: usize = 1024;
/// Sector index of the location table.
pub const LOCATION_SECTOR: u32 = 0;
/// Sector index of the timestamp table.
pub const TIMESTAMP_SECTOR: u32 = 1;
/// First sector available for chunk blobs.
pub const FIRST_DATA_SECTOR: u32 = 2;
/// Size in bytes of a chunk blob's header: `payload_length: u32` then
/// `compression: u8`.
pub const BLOB_HEADER_SIZE: usize = 5;

/// Index into the 1024-entry location/timestamp tables, `z * 32 + x`.
pub fn slot_index(x: u8, z: u8) -> usize {
    z as usize * 32 + x as usize
}

/// A populated location-table entry: where a chunk's blob starts and how
/// many sectors it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub sector_offset: u32,
    pub sector_count: u8,
}

impl Location {
    /// Packs into the wire's `sector_offset:u24 | sector_count:u8` form.
    fn to_u32(self) -> u32 {
        (self.sector_offset << 8) | self.sector_count as u32
    }

    fn from_u32(raw: u32) -> Option<Self> {
        if raw == 0 {
            return None;
        }
        Some(Location {
            sector_offset: raw >> 8,
            sector_count: (raw & 0xff) as u8,
        })
    }
}

/// Reads the 1024-entry location table from sector 0.
pub fn read_location_table<R: Read>(mut reader: R) -> Result<[Option<Location>; SLOT_COUNT]> {
    let mut table = [None; SLOT_COUNT];
    for slot in table.iter_mut() {
        let raw = reader.read_u32::<BigEndian>()?;
        *slot = Location::from_u32(raw);
    }
    Ok(table)
}

/// Reads the 1024-entry timestamp table from sector 1.
pub fn read_timestamp_table<R: Read>(mut reader: R) -> Result<[u32; SLOT_COUNT]> {
    let mut table = [0u32; SLOT_COUNT];
    for slot in table.iter_mut() {
        *slot = reader.read_u32::<BigEndian>()?;
    }
    Ok(table)
}

/// Writes the location table, zero-padded to a full sector.
pub fn write_location_table<W: Write>(
    mut writer: W,
    table: &[Option<Location>; SLOT_COUNT],
) -> Result<()> {
    for entry in table {
        let raw = entry.map(Location::to_u32).unwrap_or(0);
        writer.write_u32::<BigEndian>(raw)?;
    }
    Ok(())
}

/// Writes the timestamp table, zero-padded to a full sector.
pub fn write_timestamp_table<W: Write>(mut writer: W, table: &[u32; SLOT_COUNT]) -> Result<()> {
    for entry in table {
        writer.write_u32::<BigEndian>(*entry)?;
    }
    Ok(())
}

/// Chunk blob compression scheme (§4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zlib,
    None,
}

impl Compression {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Compression::Gzip),
            2 => Ok(Compression::Zlib),
            3 => Ok(Compression::None),
            other => Err(Error::InvalidCompression(other)),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Compression::Gzip => 1,
            Compression::Zlib => 2,
            Compression::None => 3,
        }
    }
}

/// Number of sectors a blob of `payload_length` bytes (header's own field,
/// which counts the compression byte but not the 4-byte length prefix)
/// occupies, `ceil((payload_length + 4) / SECTOR_SIZE)`.
pub fn sectors_for_payload(payload_length: u32) -> u8 {
    let total = payload_length as usize + 4;
    ((total + SECTOR_SIZE - 1) / SECTOR_SIZE) as u8
}
