//! # Tag Tree
//!
//! The attribute tree attached to an item stack.
//!
//! ## Shape
//!
//! ```text
//! Compound ──┬── "display" ── Compound ──┬── "Name" ── String
//!            │                           └── "Lore" ── List[String, ...]
//!            └── "ench" ── List[Compound, ...]
//! ```
//!
//! ## Merging
//!
//! [`merge_absent`] is the only way the renamer writes into a tree. It never
//! touches its inputs and never overwrites a key that already exists, so
//! running it twice with the same patch produces the same tree as running it
//! once.

use std::collections::btree_map::{self, BTreeMap};

/// A single node in the tag tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    /// 8-bit integer.
    Byte(i8),
    /// 16-bit integer.
    Short(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Text.
    String(String),
    /// Ordered list of nodes.
    List(Vec<Tag>),
    /// Nested named nodes.
    Compound(Compound),
}

impl Tag {
    /// Returns the nested compound, if this node is one.
    #[inline]
    #[must_use]
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Self::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// Returns the text, if this node is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Tag {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for Tag {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<Compound> for Tag {
    fn from(compound: Compound) -> Self {
        Self::Compound(compound)
    }
}

/// Named child nodes, ordered by key so equality and iteration are stable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compound(BTreeMap<String, Tag>);

impl Compound {
    /// Creates an empty compound.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Tag>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts a node, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tag>) -> Option<Tag> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a node.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.0.remove(key)
    }

    /// Gets a node by key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.get(key)
    }

    /// Gets a nested compound by key.
    #[inline]
    #[must_use]
    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.0.get(key)?.as_compound()
    }

    /// Returns true if the key is present, whatever its type.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of direct children.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no children.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over children in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Tag> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = btree_map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Merges `patch` into a copy of `base`, writing only keys `base` lacks.
///
/// Where both sides hold a compound under the same key the merge recurses, so
/// a patch of `{display: {Name}}` fills in `Name` on a base that already has
/// `{display: {Lore}}`. A key present in `base` with any other type is kept
/// as-is, even if the patch disagrees.
#[must_use]
pub fn merge_absent(base: &Compound, patch: &Compound) -> Compound {
    let mut merged = base.clone();
    merge_into(&mut merged, patch);
    merged
}

fn merge_into(target: &mut Compound, patch: &Compound) {
    for (key, value) in patch {
        match target.0.entry(key.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
            btree_map::Entry::Occupied(mut slot) => {
                if let (Tag::Compound(existing), Tag::Compound(nested)) = (slot.get_mut(), value) {
                    merge_into(existing, nested);
                }
            }
        }
    }
}
