//! TBF byte writer: turns a [`Document`] into a big-endian TBF byte buffer.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

use crate::error::Result;
use crate::tag::{Document, Tag, TagId};

/// Serializes `document` to a freshly allocated buffer.
pub fn write_bytes(document: &Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_to(document, &mut buf)?;
    Ok(buf)
}

/// Serializes `document` into `writer`.
pub fn write_to<W: Write>(document: &Document, writer: &mut W) -> Result<()> {
    writer.write_tag_id(document.root.id())?;
    writer.write_tbf_string(&document.name)?;
    write_payload(&document.root, writer)?;
    Ok(())
}

fn write_payload<W: Write>(tag: &Tag, writer: &mut W) -> Result<()> {
    match tag {
        Tag::Byte(v) => writer.write_i8(*v)?,
        Tag::Short(v) => writer.write_i16::<BigEndian>(*v)?,
        Tag::Int(v) => writer.write_i32::<BigEndian>(*v)?,
        Tag::Long(v) => writer.write_i64::<BigEndian>(*v)?,
        Tag::Float(v) => writer.write_f32::<BigEndian>(*v)?,
        Tag::Double(v) => writer.write_f64::<BigEndian>(*v)?,
        Tag::ByteArray(bytes) => {
            writer.write_i32::<BigEndian>(bytes.len() as i32)?;
            writer.write_all(bytes)?;
        }
        Tag::String(s) => writer.write_tbf_string(s)?,
        Tag::List(list) => {
            if list.is_empty() {
                // Always emit End/0 for an empty list (§4.B, scenario S2),
                // regardless of the list's declared element-variant.
                writer.write_tag_id(TagId::End)?;
                writer.write_i32::<BigEndian>(0)?;
            } else {
                writer.write_tag_id(list.element())?;
                writer.write_i32::<BigEndian>(list.len() as i32)?;
                for item in list.items() {
                    write_payload(item, writer)?;
                }
            }
        }
        Tag::Compound(compound) => {
            for (name, value) in compound.iter() {
                writer.write_tag_id(value.id())?;
                writer.write_tbf_string(name)?;
                write_payload(value, writer)?;
            }
            writer.write_tag_id(TagId::End)?;
        }
        Tag::IntArray(items) => {
            writer.write_i32::<BigEndian>(items.len() as i32)?;
            for item in items {
                writer.write_i32::<BigEndian>(*item)?;
            }
        }
        Tag::LongArray(items) => {
            writer.write_i32::<BigEndian>(items.len() as i32)?;
            for item in items {
                writer.write_i64::<BigEndian>(*item)?;
            }
        }
    }
    Ok(())
}

/// Small write-side helpers shared by every payload branch, mirroring the
/// matching read-side primitives on the cursor.
trait WriteTbt: Write {
    fn write_tag_id(&mut self, id: TagId) -> Result<()> {
        self.write_u8(id as u8)?;
        Ok(())
    }

    fn write_tbf_string(&mut self, s: &str) -> Result<()> {
        let encoded = cesu8::to_java_cesu8(s);
        self.write_u16::<BigEndian>(encoded.len() as u16)?;
        self.write_all(&encoded)?;
        Ok(())
    }
}

impl<T: Write> WriteTbt for T {}
