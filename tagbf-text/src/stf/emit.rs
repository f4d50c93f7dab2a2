//! The STF emitter: turns a [`tagbf::Tag`] into text. Deterministic given
//! the same tree — no hashmap iteration order dependency (the tree is
//! backed by an insertion-ordered map), and no locale-dependent formatting.

use tagbf::{Compound, Tag, TagList};

const COLLAPSE_LIST_WIDTH: usize = 20;
const COLLAPSE_COMPOUND_WIDTH: usize = 30;

/// Emits `tag` as STF text. `pretty` selects multi-line, indented output
/// with short children collapsed onto one line; otherwise output is fully
/// compact with no inserted whitespace.
pub fn to_stf(tag: &Tag, pretty: bool) -> String {
    if pretty {
        emit_pretty(tag, 0)
    } else {
        emit_compact(tag)
    }
}

fn itoa_str(v: impl itoa::Integer) -> String {
    itoa::Buffer::new().format(v).to_owned()
}

fn emit_compact(tag: &Tag) -> String {
    match tag {
        Tag::Byte(v) => format!("{}b", itoa_str(*v)),
        Tag::Short(v) => format!("{}s", itoa_str(*v)),
        Tag::Int(v) => itoa_str(*v),
        Tag::Long(v) => format!("{}L", itoa_str(*v)),
        Tag::Float(v) => format!("{}f", format_f32(*v)),
        Tag::Double(v) => format!("{}d", format_f64(*v)),
        Tag::ByteArray(bytes) => {
            let items: Vec<String> = bytes.iter().map(|b| format!("{}b", itoa_str(*b as i8))).collect();
            format!("[B;{}]", items.join(","))
        }
        Tag::String(s) => emit_string(s),
        Tag::List(list) => {
            let items: Vec<String> = list.items().iter().map(emit_compact).collect();
            format!("[{}]", items.join(","))
        }
        Tag::Compound(compound) => {
            let entries: Vec<String> = compound
                .iter()
                .map(|(key, value)| format!("{}:{}", emit_key(key), emit_compact(value)))
                .collect();
            format!("{{{}}}", entries.join(","))
        }
        Tag::IntArray(items) => {
            let items: Vec<String> = items.iter().map(|v| itoa_str(*v)).collect();
            format!("[I;{}]", items.join(","))
        }
        Tag::LongArray(items) => {
            let items: Vec<String> = items.iter().map(|v| format!("{}L", itoa_str(*v))).collect();
            format!("[L;{}]", items.join(","))
        }
    }
}

fn emit_pretty(tag: &Tag, depth: usize) -> String {
    match tag {
        Tag::List(list) => emit_list_pretty(list, depth),
        Tag::Compound(compound) => emit_compound_pretty(compound, depth),
        scalar => emit_compact(scalar),
    }
}

fn emit_list_pretty(list: &TagList, depth: usize) -> String {
    if list.is_empty() {
        return "[]".to_owned();
    }
    let compact: Vec<String> = list.items().iter().map(emit_compact).collect();
    if compact.iter().all(|s| s.len() < COLLAPSE_LIST_WIDTH) {
        return format!("[{}]", compact.join(", "));
    }
    let pad = "  ".repeat(depth + 1);
    let closing_pad = "  ".repeat(depth);
    let lines: Vec<String> = list
        .items()
        .iter()
        .map(|item| format!("{pad}{}", emit_pretty(item, depth + 1)))
        .collect();
    format!("[\n{}\n{closing_pad}]", lines.join(",\n"))
}

fn emit_compound_pretty(compound: &Compound, depth: usize) -> String {
    if compound.is_empty() {
        return "{}".to_owned();
    }
    let compact: Vec<String> = compound
        .iter()
        .map(|(key, value)| format!("{}:{}", emit_key(key), emit_compact(value)))
        .collect();
    if compact.iter().all(|s| s.len() < COLLAPSE_COMPOUND_WIDTH) {
        return format!("{{{}}}", compact.join(", "));
    }
    let pad = "  ".repeat(depth + 1);
    let closing_pad = "  ".repeat(depth);
    let lines: Vec<String> = compound
        .iter()
        .map(|(key, value)| format!("{pad}{}: {}", emit_key(key), emit_pretty(value, depth + 1)))
        .collect();
    format!("{{\n{}\n{closing_pad}}}", lines.join(",\n"))
}

fn format_f32(v: f32) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_owned() } else { "-inf".to_owned() };
    }
    let mut buf = ryu::Buffer::new();
    buf.format(v).to_owned()
}

fn format_f64(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_owned() } else { "-inf".to_owned() };
    }
    let mut buf = ryu::Buffer::new();
    buf.format(v).to_owned()
}

fn is_bare_key(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

fn emit_key(key: &str) -> String {
    if is_bare_key(key) {
        key.to_owned()
    } else {
        quote(key)
    }
}

/// A string value is emitted bare only when it both matches the simple
/// identifier charset *and* would not be misread back as a number, bool or
/// typed array by [`super::parse`] — otherwise the round trip would change
/// its type.
fn emit_string(s: &str) -> String {
    if is_safe_bare_string(s) {
        s.to_owned()
    } else {
        quote(s)
    }
}

fn is_safe_bare_string(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
    {
        return false;
    }
    matches!(super::parse::from_stf(s), Ok(Tag::String(parsed)) if parsed == s)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
