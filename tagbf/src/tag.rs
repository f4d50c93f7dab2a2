//! The TBF tag tree: [`Tag`], [`TagList`], [`Compound`] and [`Document`].

use indexmap::IndexMap;
use num_enum::TryFromPrimitive;
use std::ops::{Deref, DerefMut};

use crate::error::{Diagnostic, Error, Result};

/// The wire discriminant of a tag variant. Carries no payload; used to tag
/// list element-variants and to dispatch the TBF reader/writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum TagId {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagId {
    /// Short, stable name used in error messages and the STF type suffixes.
    pub fn name(self) -> &'static str {
        match self {
            TagId::End => "End",
            TagId::Byte => "Byte",
            TagId::Short => "Short",
            TagId::Int => "Int",
            TagId::Long => "Long",
            TagId::Float => "Float",
            TagId::Double => "Double",
            TagId::ByteArray => "ByteArray",
            TagId::String => "String",
            TagId::List => "List",
            TagId::Compound => "Compound",
            TagId::IntArray => "IntArray",
            TagId::LongArray => "LongArray",
        }
    }
}

/// A homogeneous, ordered sequence of tag payloads sharing one declared
/// element-variant. The element-variant is retained even when the list is
/// empty (§3 of the spec this crate implements).
#[derive(Debug, Clone, PartialEq)]
pub struct TagList {
    element: TagId,
    items: Vec<Tag>,
}

impl TagList {
    /// An empty list with the historical default element-variant (`Byte`),
    /// matching the convention spelled out for an unspecified empty list.
    pub fn new() -> Self {
        Self {
            element: TagId::Byte,
            items: Vec::new(),
        }
    }

    /// An empty list with an explicitly declared element-variant.
    pub fn empty_of(element: TagId) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// Builds a list from items, inferring the element-variant from the
    /// first item. Fails `ListTypeMismatch` if later items disagree.
    pub fn from_items(items: Vec<Tag>) -> Result<Self> {
        let element = items.first().map(Tag::id).unwrap_or(TagId::Byte);
        for (index, item) in items.iter().enumerate() {
            let found = item.id();
            if found != element {
                return Err(Error::ListTypeMismatch {
                    expected: element.name(),
                    found: found.name(),
                    index,
                });
            }
        }
        Ok(Self { element, items })
    }

    /// The declared element-variant of this list.
    pub fn element(&self) -> TagId {
        self.element
    }

    /// The payloads in order.
    pub fn items(&self) -> &[Tag] {
        &self.items
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends an item, failing if its variant does not match the list's
    /// declared element-variant (unless the list was empty with no
    /// declared variant established yet by an actual push).
    pub fn push(&mut self, item: Tag) -> Result<()> {
        if !self.items.is_empty() && item.id() != self.element {
            return Err(Error::ListTypeMismatch {
                expected: self.element.name(),
                found: item.id().name(),
                index: self.items.len(),
            });
        }
        if self.items.is_empty() {
            self.element = item.id();
        }
        self.items.push(item);
        Ok(())
    }

    /// Gets the item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    /// Gets a mutable reference to the item at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.items.get_mut(index)
    }
}

impl Default for TagList {
    fn default() -> Self {
        Self::new()
    }
}

/// An insertion-ordered mapping from name to [`Tag`]. Duplicate insertion
/// overwrites the existing entry without disturbing its original position's
/// successors (matches `IndexMap::insert` semantics for a pre-existing key).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound(IndexMap<String, Tag>);

impl Compound {
    /// An empty compound.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Inserts or overwrites `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Tag) -> Option<Tag> {
        self.0.insert(key.into(), value)
    }

    /// Removes `key`, returning its value if present. Preserves the
    /// relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.0.shift_remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the compound has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Tag> {
        self.0.iter()
    }
}

impl Deref for Compound {
    type Target = IndexMap<String, Tag>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Compound {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Tag)> for Compound {
    fn from_iter<T: IntoIterator<Item = (String, Tag)>>(iter: T) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// A complete TBF value. Numeric ranges are exactly those of their Rust
/// payload type, so construction can never produce an out-of-range value;
/// `NumericOutOfRange` is reserved for the text/JSON front-ends that parse
/// numbers from a wider representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Stored unsigned in the public API (Open Question 4); the TBF codec
    /// converts to/from the signed wire representation at the boundary.
    ByteArray(Vec<u8>),
    String(String),
    List(TagList),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// The wire variant id of this tag.
    pub fn id(&self) -> TagId {
        match self {
            Tag::Byte(_) => TagId::Byte,
            Tag::Short(_) => TagId::Short,
            Tag::Int(_) => TagId::Int,
            Tag::Long(_) => TagId::Long,
            Tag::Float(_) => TagId::Float,
            Tag::Double(_) => TagId::Double,
            Tag::ByteArray(_) => TagId::ByteArray,
            Tag::String(_) => TagId::String,
            Tag::List(_) => TagId::List,
            Tag::Compound(_) => TagId::Compound,
            Tag::IntArray(_) => TagId::IntArray,
            Tag::LongArray(_) => TagId::LongArray,
        }
    }

    /// Borrows this tag as a [`Compound`], if it is one.
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Mutably borrows this tag as a [`Compound`], if it is one.
    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Borrows this tag as a [`TagList`], if it is one.
    pub fn as_list(&self) -> Option<&TagList> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    /// Mutably borrows this tag as a [`TagList`], if it is one.
    pub fn as_list_mut(&mut self) -> Option<&mut TagList> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }
}

macro_rules! from_numeric {
    ($type:ty, $variant:ident) => {
        impl From<$type> for Tag {
            fn from(value: $type) -> Self {
                Tag::$variant(value)
            }
        }
    };
}
from_numeric!(i8, Byte);
from_numeric!(i16, Short);
from_numeric!(i32, Int);
from_numeric!(i64, Long);
from_numeric!(f32, Float);
from_numeric!(f64, Double);

impl From<bool> for Tag {
    fn from(value: bool) -> Self {
        Tag::Byte(value as i8)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_owned())
    }
}

impl From<Vec<u8>> for Tag {
    fn from(value: Vec<u8>) -> Self {
        Tag::ByteArray(value)
    }
}

impl From<Vec<i32>> for Tag {
    fn from(value: Vec<i32>) -> Self {
        Tag::IntArray(value)
    }
}

impl From<Vec<i64>> for Tag {
    fn from(value: Vec<i64>) -> Self {
        Tag::LongArray(value)
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Self {
        Tag::Compound(value)
    }
}

impl From<TagList> for Tag {
    fn from(value: TagList) -> Self {
        Tag::List(value)
    }
}

/// A top-level [`Tag`] plus its outer name (conventionally empty).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The name carried by the outer tag on the wire. Almost always empty.
    pub name: String,
    /// The root tag, conventionally a [`Tag::Compound`].
    pub root: Tag,
}

impl Document {
    /// Wraps a root tag with an outer name.
    pub fn new(name: impl Into<String>, root: Tag) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// Wraps an empty compound with an empty outer name, the common case
    /// for freshly constructed documents.
    pub fn empty() -> Self {
        Self::new("", Tag::Compound(Compound::new()))
    }

    /// Produces a bounded-depth, human-readable tree dump. Children beyond
    /// `depth` are elided with `...` rather than expanded.
    pub fn inspect(&self, depth: usize) -> String {
        let mut out = String::new();
        inspect_tag(&self.root, "", depth, 0, &mut out);
        out
    }
}

fn inspect_tag(tag: &Tag, label: &str, depth: usize, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match tag {
        Tag::Compound(c) => {
            out.push_str(&format!("{pad}{label}Compound ({} entries)\n", c.len()));
            if indent >= depth {
                if !c.is_empty() {
                    out.push_str(&format!("{}...\n", "  ".repeat(indent + 1)));
                }
                return;
            }
            for (key, value) in c.iter() {
                inspect_tag(value, &format!("{key}: "), depth, indent + 1, out);
            }
        }
        Tag::List(l) => {
            out.push_str(&format!(
                "{pad}{label}List<{}> ({} items)\n",
                l.element().name(),
                l.len()
            ));
            if indent >= depth {
                if !l.is_empty() {
                    out.push_str(&format!("{}...\n", "  ".repeat(indent + 1)));
                }
                return;
            }
            for (i, item) in l.items().iter().enumerate() {
                inspect_tag(item, &format!("[{i}]: "), depth, indent + 1, out);
            }
        }
        other => {
            out.push_str(&format!("{pad}{label}{other:?}\n"));
        }
    }
}

/// Read-only traversal that reports structural anomalies without ever
/// failing. A document built purely through this crate's constructors and
/// [`crate::path`] editor always returns an empty list here.
pub fn validate(document: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_tag(&document.root, "", &mut diagnostics);
    diagnostics
}

fn validate_tag(tag: &Tag, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match tag {
        Tag::Compound(c) => {
            for (key, value) in c.iter() {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                validate_tag(value, &child_path, diagnostics);
            }
        }
        Tag::List(l) => {
            for (i, item) in l.items().iter().enumerate() {
                if item.id() != l.element() {
                    diagnostics.push(Diagnostic::new(
                        format!("{path}.{i}"),
                        format!(
                            "list element-variant mismatch: declared {}, found {}",
                            l.element().name(),
                            item.id().name()
                        ),
                    ));
                }
                let child_path = format!("{path}.{i}");
                validate_tag(item, &child_path, diagnostics);
            }
        }
        _ => {}
    }
}
