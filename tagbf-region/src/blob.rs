//! Chunk-blob compression: the three schemes a chunk payload may be
//! stored under (§4.D).

use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression as FlateLevel;

use crate::error::Result;
use crate::sector::Compression;

/// Decompresses a chunk payload per its declared scheme.
pub fn decompress(bytes: &[u8], scheme: Compression) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match scheme {
        Compression::Gzip => {
            GzDecoder::new(bytes).read_to_end(&mut out)?;
        }
        Compression::Zlib => {
            ZlibDecoder::new(bytes).read_to_end(&mut out)?;
        }
        Compression::None => out.extend_from_slice(bytes),
    }
    Ok(out)
}

/// Compresses a serialized chunk with zlib, the scheme [`crate::RegionArchive::save`]
/// always writes (§4.D writer contract, step 2).
pub fn compress_zlib(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), FlateLevel::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
