//! # ItemRenamer Core
//!
//! The item model every other unit builds on.
//!
//! ## Architecture Rules
//!
//! 1. **The engine owns the stack** - `ItemStack` values handed to us are read
//!    and cloned, never mutated in place
//! 2. **Tags are plain data** - display metadata is a tagged-variant tree with
//!    a pure merge function, not a wrapper around any vendor type
//! 3. **Readers never block writers for long** - shared state lives behind
//!    `Snapshot` cells that hand out immutable `Arc`s
//!
//! ## Example
//!
//! ```rust,ignore
//! use itemrenamer_core::{Compound, ItemStack, Tag, merge_absent};
//!
//! let stack = ItemStack::new(1, 3, 64);
//! let patch = Compound::new().with("display", Tag::Compound(Compound::new()));
//! let tag = merge_absent(&Compound::new(), &patch);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod events;
pub mod item;
pub mod selection;
pub mod sync;
pub mod tag;

pub use events::{
    ClickType, GameEvent, HeldItemChangeEvent, InventoryClickEvent, Listener, Player, PlayerId,
    PlayerJoinEvent, PlayerQuitEvent,
};
pub use item::{
    is_empty_slot, Damage, ItemId, ItemIdentity, ItemStack, SlotContext, AIR, DISPLAY_KEY,
    LORE_KEY, NAME_KEY,
};
pub use selection::SelectionTracker;
pub use sync::Snapshot;
pub use tag::{merge_absent, Compound, Tag};

/// Number of hotbar slots a player can hold an item from.
pub const HOTBAR_SLOTS: u8 = 9;
