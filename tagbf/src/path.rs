//! Path-addressed read/write access over a [`Document`], plus the native
//! value type-inference table used to auto-type constructed tags.

use crate::error::{Error, Result};
use crate::tag::{Compound, Document, Tag, TagId, TagList};

/// A native Rust value that has not yet been promoted to a [`Tag`]. This is
/// the common currency accepted by [`set`], [`create_compound`] and
/// [`create_list`]; a bare [`Tag`] is always accepted too (it promotes to
/// itself).
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Native>),
    Map(Vec<(String, Native)>),
    /// Already-typed tag; passed through unchanged by [`infer`].
    Tag(Tag),
    /// No native representation; stringified via its `Display`/`Debug` form
    /// by the caller before construction.
    Other(String),
}

impl From<Tag> for Native {
    fn from(value: Tag) -> Self {
        Native::Tag(value)
    }
}

macro_rules! from_int {
    ($($t:ty),+) => {
        $(impl From<$t> for Native {
            fn from(value: $t) -> Self {
                Native::Int(value as i64)
            }
        })+
    };
}
from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Native {
    fn from(value: bool) -> Self {
        Native::Bool(value)
    }
}

impl From<f32> for Native {
    fn from(value: f32) -> Self {
        Native::Float(value as f64)
    }
}

impl From<f64> for Native {
    fn from(value: f64) -> Self {
        Native::Float(value)
    }
}

impl From<String> for Native {
    fn from(value: String) -> Self {
        Native::Str(value)
    }
}

impl From<&str> for Native {
    fn from(value: &str) -> Self {
        Native::Str(value.to_owned())
    }
}

impl<T: Into<Native>> From<Vec<T>> for Native {
    fn from(value: Vec<T>) -> Self {
        Native::Seq(value.into_iter().map(Into::into).collect())
    }
}

/// Promotes a [`Native`] to a [`Tag`] using the type-inference table (§4.C):
/// the narrowest signed integer variant that fits, `Double` for non-integer
/// numbers, `String` for strings, recursively inferred `List`/`Compound`
/// for sequences/maps, and a printed-form `String` for anything else.
pub fn infer(value: Native) -> Result<Tag> {
    Ok(match value {
        Native::Tag(tag) => tag,
        Native::Bool(b) => Tag::Byte(b as i8),
        Native::Int(i) => {
            if let Ok(v) = i8::try_from(i) {
                Tag::Byte(v)
            } else if let Ok(v) = i16::try_from(i) {
                Tag::Short(v)
            } else if let Ok(v) = i32::try_from(i) {
                Tag::Int(v)
            } else {
                Tag::Long(i)
            }
        }
        Native::Float(f) => Tag::Double(f),
        Native::Str(s) => Tag::String(s),
        Native::Seq(items) => {
            let elem = items.first().map(|_| ()).is_some();
            let mut tags = Vec::with_capacity(items.len());
            for item in items {
                tags.push(infer(item)?);
            }
            let _ = elem;
            Tag::List(TagList::from_items(tags)?)
        }
        Native::Map(entries) => {
            let mut compound = Compound::new();
            for (key, value) in entries {
                compound.insert(key, infer(value)?);
            }
            Tag::Compound(compound)
        }
        Native::Other(printed) => Tag::String(printed),
    })
}

/// Builds a [`Tag::Compound`] from `entries`, inferring each value's
/// variant via [`infer`].
pub fn create_compound(entries: Vec<(String, Native)>) -> Result<Tag> {
    infer(Native::Map(entries))
}

/// Builds a [`Tag::List`] from `items`. If `elem_variant` is omitted it is
/// inferred from the first item; heterogeneous input fails
/// `ListTypeMismatch`.
pub fn create_list(items: Vec<Native>, elem_variant: Option<TagId>) -> Result<Tag> {
    let mut tags = Vec::with_capacity(items.len());
    for item in items {
        tags.push(infer(item)?);
    }
    let list = match elem_variant {
        None => TagList::from_items(tags)?,
        Some(declared) => {
            for (index, tag) in tags.iter().enumerate() {
                if tag.id() != declared {
                    return Err(Error::ListTypeMismatch {
                        expected: declared.name(),
                        found: tag.id().name(),
                        index,
                    });
                }
            }
            let mut list = TagList::empty_of(declared);
            for tag in tags {
                list.push(tag)?;
            }
            list
        }
    };
    Ok(Tag::List(list))
}

/// One segment of a dot-separated path: either a compound key or a list
/// index (any segment that parses as `usize`).
#[derive(Debug, Clone, PartialEq)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

fn parse_path(path: &str) -> Vec<Segment<'_>> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.')
        .map(|part| match part.parse::<usize>() {
            Ok(index) => Segment::Index(index),
            Err(_) => Segment::Key(part),
        })
        .collect()
}

/// Returns a reference to the tag addressed by `path`, or `None` if any
/// segment is missing. An empty path addresses the document root.
pub fn get<'a>(document: &'a Document, path: &str) -> Option<&'a Tag> {
    let segments = parse_path(path);
    let mut current = &document.root;
    for segment in segments {
        current = match (segment, current) {
            (Segment::Key(key), Tag::Compound(c)) => c.get(key)?,
            (Segment::Index(index), Tag::List(l)) => l.get(index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Sets the tag at `path` to `value` (a [`Tag`] or anything `Into<Native>`).
/// Parent segments must already exist; fails `InvalidPath` otherwise.
pub fn set(document: &mut Document, path: &str, value: impl Into<Native>) -> Result<()> {
    let tag = infer(value.into())?;
    let segments = parse_path(path);
    if segments.is_empty() {
        document.root = tag;
        return Ok(());
    }
    set_inner(&mut document.root, &segments, tag)
}

fn set_inner(root: &mut Tag, segments: &[Segment<'_>], value: Tag) -> Result<()> {
    let (head, rest) = segments.split_first().expect("non-empty path");
    if rest.is_empty() {
        return match (head, root) {
            (Segment::Key(key), Tag::Compound(c)) => {
                c.insert(*key, value);
                Ok(())
            }
            (Segment::Index(index), Tag::List(l)) => {
                let len = l.len();
                match l.get_mut(*index) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(Error::IndexOutOfBounds { index: *index, len }),
                }
            }
            _ => Err(Error::InvalidPath(format!("{head:?}"))),
        };
    }

    match (head, root) {
        (Segment::Key(key), Tag::Compound(c)) => match c.get_mut(*key) {
            Some(child) => set_inner(child, rest, value),
            None => Err(Error::InvalidPath(format!("no such key: {key}"))),
        },
        (Segment::Index(index), Tag::List(l)) => match l.get_mut(*index) {
            Some(child) => set_inner(child, rest, value),
            None => Err(Error::IndexOutOfBounds {
                index: *index,
                len: l.len(),
            }),
        },
        _ => Err(Error::InvalidPath(format!("{head:?}"))),
    }
}
