//! JSON-view codec: a lossy-by-design `{ name, type, value }` projection of
//! a [`Document`], plus ingest that reconstructs a [`Document`] by running
//! the same type-inference table the path editor uses (§4.E).

use serde_json::{Map, Number, Value};

use tagbf::{infer, Compound, Document, Native, Tag, TagId, TagList};

use crate::error::{Error, Result};

/// Produces the JSON view of `document`: `{ "name": ..., "type": ...,
/// "value": ... }`, where `value` recursively erases tags to native JSON.
/// `Long` values are carried as JSON strings to avoid precision loss, and a
/// `List`'s element-variant is not represented (lost on this projection).
pub fn to_json(document: &Document) -> Value {
    let mut map = Map::new();
    map.insert("name".to_owned(), Value::String(document.name.clone()));
    map.insert(
        "type".to_owned(),
        Value::String(type_name(document.root.id())),
    );
    map.insert("value".to_owned(), erase(&document.root));
    Value::Object(map)
}

fn type_name(id: TagId) -> String {
    id.name().to_ascii_lowercase()
}

fn erase(tag: &Tag) -> Value {
    match tag {
        Tag::Byte(v) => Value::Number((*v as i64).into()),
        Tag::Short(v) => Value::Number((*v as i64).into()),
        Tag::Int(v) => Value::Number((*v as i64).into()),
        Tag::Long(v) => Value::String(v.to_string()),
        Tag::Float(v) => Number::from_f64(*v as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Tag::Double(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        Tag::ByteArray(bytes) => Value::Array(
            bytes
                .iter()
                .map(|b| Value::Number((*b as i64).into()))
                .collect(),
        ),
        Tag::String(s) => Value::String(s.clone()),
        Tag::List(list) => Value::Array(list.items().iter().map(erase).collect()),
        Tag::Compound(compound) => {
            let mut map = Map::new();
            for (key, value) in compound.iter() {
                map.insert(key.clone(), erase(value));
            }
            Value::Object(map)
        }
        Tag::IntArray(items) => Value::Array(
            items
                .iter()
                .map(|v| Value::Number((*v as i64).into()))
                .collect(),
        ),
        Tag::LongArray(items) => {
            Value::Array(items.iter().map(|v| Value::String(v.to_string())).collect())
        }
    }
}

/// Ingests a JSON value into a [`Document`] with an empty outer name. A
/// node shaped `{ "type": "...", "value": ... }` is built exactly as the
/// named type directs; any other node runs the native type-inference table
/// (§4.C) used by the path editor.
pub fn from_json(value: Value) -> Result<Document> {
    let tag = json_to_tag(&value)?;
    Ok(Document::new("", tag))
}

fn json_to_tag(value: &Value) -> Result<Tag> {
    if let Value::Object(map) = value {
        if let Some(type_value) = map.get("type") {
            let type_name = type_value
                .as_str()
                .ok_or_else(|| Error::InvalidJson("`type` field must be a string".to_owned()))?;
            let inner = map.get("value").unwrap_or(&Value::Null);
            return typed(type_name, inner);
        }
    }
    let native = to_native(value);
    infer(native).map_err(Error::from)
}

fn typed(type_name: &str, value: &Value) -> Result<Tag> {
    match type_name.to_ascii_lowercase().as_str() {
        "byte" => json_long(value).and_then(|v| narrow(v, "Byte")).map(Tag::Byte),
        "short" => json_long(value).and_then(|v| narrow(v, "Short")).map(Tag::Short),
        "int" => json_long(value).and_then(|v| narrow(v, "Int")).map(Tag::Int),
        "long" => json_long(value).map(Tag::Long),
        "float" => json_float(value).map(|v| Tag::Float(v as f32)),
        "double" => json_float(value).map(Tag::Double),
        "bytearray" | "byte_array" => json_array(value, |v| {
            json_long(v).and_then(|n| narrow(n, "ByteArray"))
        })
        .map(Tag::ByteArray),
        "string" => value
            .as_str()
            .map(|s| Tag::String(s.to_owned()))
            .ok_or_else(|| Error::InvalidJson("expected a json string".to_owned())),
        "list" => {
            let items = value
                .as_array()
                .ok_or_else(|| Error::InvalidJson("expected a json array for list".to_owned()))?;
            let tags = items.iter().map(json_to_tag).collect::<Result<Vec<_>>>()?;
            Ok(Tag::List(TagList::from_items(tags)?))
        }
        "compound" => {
            let object = value.as_object().ok_or_else(|| {
                Error::InvalidJson("expected a json object for compound".to_owned())
            })?;
            let mut compound = Compound::new();
            for (key, value) in object {
                compound.insert(key.clone(), json_to_tag(value)?);
            }
            Ok(Tag::Compound(compound))
        }
        "intarray" | "int_array" => {
            json_array(value, |v| json_long(v).and_then(|n| narrow(n, "IntArray"))).map(Tag::IntArray)
        }
        "longarray" | "long_array" => {
            json_array(value, json_long).map(Tag::LongArray)
        }
        other => Err(Error::UnknownType(other.to_owned())),
    }
}

/// Narrows `value` (read from a JSON number/numeric string) into `T`,
/// failing `NumericOutOfRange` rather than silently truncating/wrapping —
/// an explicit `type` hint still enforces the declared variant's range
/// (§3 "Numeric ranges are enforced on construction").
fn narrow<T>(value: i64, variant: &'static str) -> Result<T>
where
    T: TryFrom<i64>,
{
    T::try_from(value).map_err(|_| {
        Error::Tag(tagbf::Error::NumericOutOfRange {
            variant,
            value: value.to_string(),
        })
    })
}

fn json_array<T>(value: &Value, mut each: impl FnMut(&Value) -> Result<T>) -> Result<Vec<T>> {
    value
        .as_array()
        .ok_or_else(|| Error::InvalidJson("expected a json array".to_owned()))?
        .iter()
        .map(|v| each(v))
        .collect()
}

fn json_long(value: &Value) -> Result<i64> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    if let Some(s) = value.as_str() {
        return s
            .parse()
            .map_err(|_| Error::InvalidJson(format!("not an integer: {s}")));
    }
    Err(Error::InvalidJson(format!(
        "expected an integer, found {value}"
    )))
}

fn json_float(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::InvalidJson(format!("expected a number, found {value}")))
}

fn to_native(value: &Value) -> Native {
    match value {
        Value::Null => Native::Other("null".to_owned()),
        Value::Bool(b) => Native::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Native::Int(i)
            } else {
                Native::Float(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Native::Str(s.clone()),
        Value::Array(items) => Native::Seq(items.iter().map(to_native).collect()),
        Value::Object(map) => {
            Native::Map(map.iter().map(|(k, v)| (k.clone(), to_native(v))).collect())
        }
    }
}
