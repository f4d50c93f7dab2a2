use serde_json::json;
use tagbf::{Compound, Document, Tag};

use crate::{from_json, to_json, Error};

#[test]
fn json_view_prints_long_as_string() {
    let mut compound = Compound::new();
    compound.insert("n", Tag::Long(9_223_372_036_854_775_807));
    let doc = Document::new("", Tag::Compound(compound));

    let view = to_json(&doc);
    assert_eq!(view["type"], "compound");
    assert_eq!(view["value"]["n"], "9223372036854775807");
}

#[test]
fn json_ingest_with_explicit_type_infers_nested_fields() {
    let value = json!({
        "type": "compound",
        "value": { "n": 9_223_372_036_854_775_807i64 }
    });

    let doc = from_json(value).unwrap();
    let compound = doc.root.as_compound().unwrap();
    assert_eq!(compound.get("n"), Some(&Tag::Long(9_223_372_036_854_775_807)));
}

#[test]
fn json_ingest_without_type_hint_runs_inference() {
    let value = json!({ "small": 5, "big": 1i64 << 40, "name": "hi", "items": [1, 2, 3] });
    let doc = from_json(value).unwrap();
    let compound = doc.root.as_compound().unwrap();
    assert_eq!(compound.get("small"), Some(&Tag::Byte(5)));
    assert_eq!(compound.get("big"), Some(&Tag::Long(1 << 40)));
    assert_eq!(compound.get("name"), Some(&Tag::String("hi".to_owned())));
}

#[test]
fn json_ingest_rejects_an_out_of_range_typed_byte() {
    let value = json!({ "type": "byte", "value": 200 });
    let err = from_json(value).unwrap_err();
    assert!(matches!(err, Error::Tag(tagbf::Error::NumericOutOfRange { .. })));
}

#[test]
fn json_ingest_rejects_an_out_of_range_typed_bytearray_element() {
    let value = json!({ "type": "bytearray", "value": [1, 2, 300] });
    let err = from_json(value).unwrap_err();
    assert!(matches!(err, Error::Tag(tagbf::Error::NumericOutOfRange { .. })));
}

#[test]
fn json_view_round_trips_long_array_as_strings() {
    let doc = Document::new("", Tag::LongArray(vec![1, -2, 3]));
    let view = to_json(&doc);
    assert_eq!(view["value"], serde_json::json!(["1", "-2", "3"]));
}
