//! TBF byte reader: turns a big-endian TBF byte buffer into a [`Document`].

use byteorder::{BigEndian, ByteOrder};
use num_enum::TryFromPrimitiveError;
use std::convert::TryFrom;

use crate::error::{Error, Result};
use crate::tag::{Compound, Document, Tag, TagId, TagList};

/// Parses a [`Document`] from `data` starting at `offset`, returning the
/// document and the number of bytes consumed.
pub fn read_bytes(data: &[u8]) -> Result<Document> {
    let mut cursor = Cursor { data, pos: 0 };
    let doc = cursor.read_document()?;
    Ok(doc)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn need(&self, n: usize) -> Result<()> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.data.len() => Ok(()),
            Some(end) => Err(Error::Truncated {
                needed: end - self.data.len(),
            }),
            None => Err(Error::Truncated { needed: usize::MAX }),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn i8(&mut self) -> Result<i8> {
        Ok(self.u8()? as i8)
    }

    fn i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    fn f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.take(4)?))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    fn tag_id(&mut self) -> Result<TagId> {
        let raw = self.u8()?;
        TagId::try_from(raw).map_err(|TryFromPrimitiveError { number }| Error::UnknownVariant(number))
    }

    /// Reads a 32-bit length prefix, rejecting a negative declared length
    /// instead of sign-extending it into a huge `usize` (which would blow
    /// up a downstream `take`/`Vec::with_capacity`; §7's "never panics on
    /// bad input" applies to malformed array/list lengths too).
    fn len_prefix(&mut self) -> Result<usize> {
        let len = self.i32()?;
        usize::try_from(len).map_err(|_| Error::Truncated {
            needed: len.unsigned_abs() as usize,
        })
    }

    fn string(&mut self) -> Result<String> {
        let len = BigEndian::read_u16(self.take(2)?) as usize;
        let bytes = self.take(len)?;
        cesu8::from_java_cesu8(bytes)
            .map(|cow| cow.into_owned())
            .map_err(|_| Error::InvalidString)
    }

    fn read_document(&mut self) -> Result<Document> {
        let id = self.tag_id()?;
        let name = self.string()?;
        let root = self.read_payload(id)?;
        Ok(Document::new(name, root))
    }

    fn read_payload(&mut self, id: TagId) -> Result<Tag> {
        match id {
            TagId::End => unreachable!("End is only read via read_compound"),
            TagId::Byte => Ok(Tag::Byte(self.i8()?)),
            TagId::Short => Ok(Tag::Short(self.i16()?)),
            TagId::Int => Ok(Tag::Int(self.i32()?)),
            TagId::Long => Ok(Tag::Long(self.i64()?)),
            TagId::Float => Ok(Tag::Float(self.f32()?)),
            TagId::Double => Ok(Tag::Double(self.f64()?)),
            TagId::ByteArray => {
                let len = self.len_prefix()?;
                let bytes = self.take(len)?;
                Ok(Tag::ByteArray(bytes.to_vec()))
            }
            TagId::String => Ok(Tag::String(self.string()?)),
            TagId::List => self.read_list(),
            TagId::Compound => self.read_compound(),
            TagId::IntArray => {
                let len = self.len_prefix()?;
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.i32()?);
                }
                Ok(Tag::IntArray(items))
            }
            TagId::LongArray => {
                let len = self.len_prefix()?;
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.i64()?);
                }
                Ok(Tag::LongArray(items))
            }
        }
    }

    fn read_list(&mut self) -> Result<Tag> {
        let elem = self.tag_id()?;
        let len = self.len_prefix()?;
        if elem == TagId::End {
            // Compatibility form: empty list written with End as the
            // element-variant promotes to an empty Byte list (§4.B).
            return Ok(Tag::List(TagList::empty_of(TagId::Byte)));
        }
        let mut items = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            items.push(self.read_payload(elem)?);
        }
        let mut list = TagList::empty_of(elem);
        for item in items {
            // Items share `elem`'s variant by construction, so this cannot fail.
            list.push(item).expect("homogeneous list from reader");
        }
        Ok(Tag::List(list))
    }

    fn read_compound(&mut self) -> Result<Tag> {
        let mut compound = Compound::new();
        loop {
            let id = self.tag_id()?;
            if id == TagId::End {
                break;
            }
            let name = self.string()?;
            let value = self.read_payload(id)?;
            compound.insert(name, value);
        }
        Ok(Tag::Compound(compound))
    }
}
