//! # Item Stacks
//!
//! The authoritative item representation as the engine hands it to us.
//!
//! A stack is `(type, damage, count, tag)`. The `(type, damage)` pair is the
//! identity rules are matched against; the tag carries the display metadata
//! the client renders.

use crate::tag::{Compound, Tag};

/// Unique identifier for an item type.
pub type ItemId = u32;

/// Damage value - distinguishes subtype/durability variants of one item type.
pub type Damage = i16;

/// The placeholder "nothing here" item type.
pub const AIR: ItemId = 0;

/// Tag key holding the display compound.
pub const DISPLAY_KEY: &str = "display";
/// Display key holding the custom name.
pub const NAME_KEY: &str = "Name";
/// Display key holding the lore lines.
pub const LORE_KEY: &str = "Lore";

/// The matching key for rename rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemIdentity {
    /// Item type.
    pub type_id: ItemId,
    /// Damage value.
    pub damage: Damage,
}

impl ItemIdentity {
    /// Creates a new identity.
    #[inline]
    #[must_use]
    pub const fn new(type_id: ItemId, damage: Damage) -> Self {
        Self { type_id, damage }
    }
}

/// A stack of items, including its tag tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemStack {
    /// The item type ID, or `AIR` for an empty placeholder.
    pub type_id: ItemId,
    /// Damage value.
    pub damage: Damage,
    /// Number of items in this stack.
    pub count: u32,
    /// Attribute tree, if the stack carries one.
    pub tag: Option<Compound>,
}

impl ItemStack {
    /// Creates a new stack without a tag.
    #[inline]
    #[must_use]
    pub const fn new(type_id: ItemId, damage: Damage, count: u32) -> Self {
        Self {
            type_id,
            damage,
            count,
            tag: None,
        }
    }

    /// Creates an empty placeholder stack.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(AIR, 0, 0)
    }

    /// Attaches a tag tree.
    #[must_use]
    pub fn with_tag(mut self, tag: Compound) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Returns the rule-matching identity of this stack.
    #[inline]
    #[must_use]
    pub const fn identity(&self) -> ItemIdentity {
        ItemIdentity::new(self.type_id, self.damage)
    }

    /// Returns true if this is the placeholder type.
    ///
    /// The count is deliberately not consulted: a zero-count stack of a real
    /// type is still a stack.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.type_id == AIR
    }

    /// Returns the display compound, if present.
    #[must_use]
    pub fn display(&self) -> Option<&Compound> {
        self.tag.as_ref()?.get_compound(DISPLAY_KEY)
    }

    /// Returns the custom display name, if present.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self.display()?.get(NAME_KEY)? {
            Tag::String(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns the lore lines, if present.
    ///
    /// Non-string entries in the list are skipped.
    #[must_use]
    pub fn lore(&self) -> Option<Vec<&str>> {
        match self.display()?.get(LORE_KEY)? {
            Tag::List(lines) => Some(
                lines
                    .iter()
                    .filter_map(|line| match line {
                        Tag::String(text) => Some(text.as_str()),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Returns true if the optional stack is absent or the placeholder type.
#[inline]
#[must_use]
pub fn is_empty_slot(stack: Option<&ItemStack>) -> bool {
    stack.map_or(true, ItemStack::is_empty)
}

/// The inventory position an item occupies while it is being renamed.
///
/// There is intentionally no `Default`: an item without a slot (the cursor,
/// another entity's hand) must say so with [`SlotContext::NONE`], never by
/// falling back to slot 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotContext(i32);

impl SlotContext {
    /// No slot - the item is on the cursor or otherwise unplaced.
    pub const NONE: Self = Self(-1);

    /// Creates a slot context. Any negative index means [`SlotContext::NONE`].
    #[inline]
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        if raw < 0 {
            Self::NONE
        } else {
            Self(raw)
        }
    }

    /// Returns the slot index, or `None` for [`SlotContext::NONE`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<u32> {
        if self.0 < 0 {
            None
        } else {
            Some(self.0.unsigned_abs())
        }
    }

    /// Returns the raw wire value (-1 for none).
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Returns true for [`SlotContext::NONE`].
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 < 0
    }
}

impl From<u8> for SlotContext {
    fn from(slot: u8) -> Self {
        Self(i32::from(slot))
    }
}
