//! The TBF binary codec: reader, writer, and gzip-wrapped variants.

mod reader;
mod writer;

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;
use crate::tag::Document;

pub use reader::read_bytes;
pub use writer::{write_bytes, write_to};

/// Parses a [`Document`] from any [`Read`] stream of TBF bytes. Buffers the
/// whole stream before parsing, since the reader works over a borrowed
/// slice for speed.
pub fn read_from<R: Read>(mut reader: R) -> Result<Document> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    read_bytes(&buf)
}

/// Parses a [`Document`] from a gzip-compressed TBF stream.
pub fn read_gzip<R: Read>(reader: R) -> Result<Document> {
    let mut decoder = GzDecoder::new(reader);
    let mut buf = Vec::new();
    decoder.read_to_end(&mut buf)?;
    read_bytes(&buf)
}

/// Serializes `document` and wraps it in a gzip stream with default
/// compression. No header beyond gzip's own is added.
pub fn write_gzip<W: Write>(document: &Document, writer: W) -> Result<()> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    write_to(document, &mut encoder)?;
    encoder.finish()?;
    Ok(())
}

/// Convenience wrapper returning the gzip bytes directly.
pub fn write_gzip_bytes(document: &Document) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_gzip(document, &mut out)?;
    Ok(out)
}
