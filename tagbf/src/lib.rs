//! A tagged binary tree format: a typed, self-describing binary
//! serialization of nested compounds, lists and scalars, modeled on
//! *Minecraft: Java Edition*'s NBT wire format.
//!
//! [`tag`] holds the in-memory tree (`Tag`, `TagList`, `Compound`,
//! `Document`). [`io`] is the binary codec (plain and gzip-wrapped).
//! [`path`] is a dot-separated path editor over a [`Document`], including
//! the native-value type-inference table used by its `set`/`create_*`
//! helpers.

mod error;
mod io;
mod path;
mod tag;

pub use error::{Diagnostic, Error, Result};
pub use io::{read_bytes, read_from, read_gzip, write_bytes, write_gzip, write_gzip_bytes, write_to};
pub use path::{create_compound, create_list, get, infer, set, Native};
pub use tag::{validate, Compound, Document, Tag, TagId, TagList};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_single_int_entry_to_the_exact_wire_bytes() {
        let mut compound = Compound::new();
        compound.insert("Hello", Tag::Int(42));
        let doc = Document::new("", Tag::Compound(compound));

        let bytes = write_bytes(&doc).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x0A, 0x00, 0x00, // Compound, outer name length 0
                0x03, 0x00, 0x05, b'H', b'e', b'l', b'l', b'o', // Int "Hello"
                0x00, 0x00, 0x00, 0x2A, // 42
                0x00, // End
            ]
        );
        assert_eq!(read_bytes(&bytes).unwrap(), doc);
    }

    #[test]
    fn negative_array_lengths_are_rejected_instead_of_panicking() {
        // IntArray tag named "" with declared length -1.
        let int_array = vec![
            TagId::IntArray as u8,
            0x00,
            0x00, // name length 0
            0xFF,
            0xFF,
            0xFF,
            0xFF, // len = -1
        ];
        assert!(read_bytes(&int_array).is_err());

        // LongArray tag named "" with declared length -1.
        let mut long_array = vec![TagId::LongArray as u8, 0x00, 0x00];
        long_array.extend_from_slice(&(-1i32).to_be_bytes());
        assert!(read_bytes(&long_array).is_err());

        // ByteArray tag named "" with declared length -1, positioned after
        // some preceding bytes so a sign-extended length would overflow
        // `pos + n` rather than merely read out of the empty buffer.
        let mut byte_array = vec![TagId::Compound as u8, 0x00, 0x00];
        byte_array.push(TagId::ByteArray as u8);
        byte_array.extend_from_slice(&[0x00, 0x01, b'a']); // name "a"
        byte_array.extend_from_slice(&(-1i32).to_be_bytes());
        byte_array.push(TagId::End as u8);
        assert!(read_bytes(&byte_array).is_err());
    }

    #[test]
    fn round_trip_empty_compound() {
        let doc = Document::empty();
        let bytes = write_bytes(&doc).unwrap();
        let parsed = read_bytes(&bytes).unwrap();
        assert_eq!(doc, parsed);
    }

    #[test]
    fn round_trip_scalars() {
        let mut compound = Compound::new();
        compound.insert("byte", Tag::Byte(-1));
        compound.insert("short", Tag::Short(300));
        compound.insert("int", Tag::Int(70000));
        compound.insert("long", Tag::Long(1 << 40));
        compound.insert("float", Tag::Float(1.5));
        compound.insert("double", Tag::Double(2.5));
        compound.insert("name", Tag::String("hello".to_owned()));
        let doc = Document::new("root", Tag::Compound(compound));

        let bytes = write_bytes(&doc).unwrap();
        let parsed = read_bytes(&bytes).unwrap();
        assert_eq!(doc, parsed);
    }

    #[test]
    fn empty_list_round_trips_and_promotes_to_byte() {
        let list = TagList::empty_of(TagId::Long);
        let mut compound = Compound::new();
        compound.insert("empty", Tag::List(list));
        let doc = Document::new("", Tag::Compound(compound));

        let bytes = write_bytes(&doc).unwrap();
        // Element-variant byte is always End/0 for an empty list on the wire.
        assert_eq!(bytes[bytes.len() - 6], TagId::End as u8);

        let parsed = read_bytes(&bytes).unwrap();
        let list = parsed
            .root
            .as_compound()
            .unwrap()
            .get("empty")
            .unwrap()
            .as_list()
            .unwrap();
        assert_eq!(list.element(), TagId::Byte);
        assert!(list.is_empty());
    }

    #[test]
    fn path_get_and_set_through_nested_structure() {
        let mut doc = Document::empty();
        set(&mut doc, "name", "crate").unwrap();
        set(&mut doc, "scores", create_list(vec![1.into(), 2.into(), 3.into()], None).unwrap())
            .unwrap();
        set(&mut doc, "scores.1", 42).unwrap();

        assert_eq!(get(&doc, "name"), Some(&Tag::String("crate".to_owned())));
        assert_eq!(get(&doc, "scores.1"), Some(&Tag::Byte(42)));
        assert_eq!(get(&doc, "scores.9"), None);
    }

    #[test]
    fn validate_accepts_a_well_formed_document() {
        let list = TagList::from_items(vec![Tag::Int(1), Tag::Int(2)]).unwrap();
        let mut compound = Compound::new();
        compound.insert("ok", Tag::List(list));
        let doc = Document::new("", Tag::Compound(compound));
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn create_compound_infers_narrowest_integer() {
        let tag = create_compound(vec![
            ("small".to_owned(), 5.into()),
            ("big".to_owned(), (1_i64 << 40).into()),
        ])
        .unwrap();
        let compound = tag.as_compound().unwrap();
        assert_eq!(compound.get("small"), Some(&Tag::Byte(5)));
        assert_eq!(compound.get("big"), Some(&Tag::Long(1 << 40)));
    }
}
