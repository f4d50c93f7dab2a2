//! Stringified text form (STF): the human-readable mirror of TBF (§4.E).
//!
//! [`to_stf`]/[`from_stf`] operate on a bare [`Tag`] — STF has no room for
//! a [`Document`]'s outer name, so ingest always produces a [`Document`]
//! with an empty name, matching the common case for constructed documents.

mod emit;
mod grammar;
mod parse;

use tagbf::{Document, Tag};

use crate::error::Result;

pub use emit::to_stf;
pub use parse::from_stf as from_stf_tag;

/// Parses STF text into a [`Document`] with an empty outer name.
pub fn from_stf(input: &str) -> Result<Document> {
    let tag = parse::from_stf(input)?;
    Ok(Document::new("", tag))
}

/// Emits a [`Document`]'s root tag as STF text (the outer name is dropped).
pub fn document_to_stf(document: &Document, pretty: bool) -> String {
    to_stf(&document.root, pretty)
}

#[cfg(test)]
mod test {
    use super::*;
    use tagbf::{Compound, TagId, TagList};

    #[test]
    fn round_trip_compact_compound() {
        let mut c = Compound::new();
        c.insert("a", Tag::Byte(1));
        c.insert("b", Tag::IntArray(vec![1, 2, 3]));
        c.insert("c", Tag::String("x y".to_owned()));
        let tag = Tag::Compound(c);

        let text = to_stf(&tag, false);
        assert_eq!(text, r#"{a:1b,b:[I;1,2,3],c:"x y"}"#);

        let parsed = parse::from_stf(&text).unwrap();
        assert_eq!(parsed, tag);
    }

    #[test]
    fn bare_string_that_looks_numeric_is_quoted() {
        let mut c = Compound::new();
        c.insert("n", Tag::String("42".to_owned()));
        let tag = Tag::Compound(c);
        let text = to_stf(&tag, false);
        assert_eq!(text, r#"{n:"42"}"#);
        assert_eq!(parse::from_stf(&text).unwrap(), tag);
    }

    #[test]
    fn long_array_round_trips() {
        let tag = Tag::LongArray(vec![1, -2, 3]);
        let text = to_stf(&tag, false);
        assert_eq!(text, "[L;1L,-2L,3L]");
        assert_eq!(parse::from_stf(&text).unwrap(), tag);
    }

    #[test]
    fn pretty_print_collapses_short_children() {
        let list = TagList::from_items(vec![Tag::Int(1), Tag::Int(2), Tag::Int(3)]).unwrap();
        let tag = Tag::List(list);
        assert_eq!(to_stf(&tag, true), "[1, 2, 3]");
    }

    #[test]
    fn pretty_print_expands_long_children() {
        let long_string = "x".repeat(25);
        let list = TagList::from_items(vec![
            Tag::String(long_string.clone()),
            Tag::String(long_string.clone()),
        ])
        .unwrap();
        let tag = Tag::List(list);
        let text = to_stf(&tag, true);
        assert!(text.contains('\n'));
        assert_eq!(parse::from_stf(&text).unwrap(), tag);
    }

    #[test]
    fn empty_list_round_trips() {
        let tag = Tag::List(TagList::empty_of(TagId::Long));
        let text = to_stf(&tag, false);
        assert_eq!(text, "[]");
        // The wire-level element-variant promotion happens in the TBF
        // codec, not STF: STF's empty list has no element-variant syntax.
        let parsed = parse::from_stf(&text).unwrap();
        assert_eq!(parsed, Tag::List(TagList::new()));
    }

    #[test]
    fn float_and_double_suffixes_round_trip() {
        let mut c = Compound::new();
        c.insert("f", Tag::Float(1.5));
        c.insert("d", Tag::Double(2.25));
        let tag = Tag::Compound(c);
        let text = to_stf(&tag, false);
        let parsed = parse::from_stf(&text).unwrap();
        assert_eq!(parsed, tag);
    }
}
