//! # Game Events
//!
//! The closed set of engine events the renamer reacts to, and the listener
//! trait that receives them.
//!
//! ## Event Flow
//!
//! ```text
//! Engine (simulation context)
//!     │
//!     ├── InventoryClick ───► StackIdentityGuard (may cancel)
//!     ├── HeldItemChange ───► SelectionTracker
//!     ├── PlayerJoin ───────► SelectionTracker
//!     └── PlayerQuit ───────► SelectionTracker
//! ```
//!
//! Each listener implements only the methods for the variants it cares about;
//! the rest default to no-ops.

use crate::item::ItemStack;

/// Unique identifier for a connected player.
pub type PlayerId = u32;

/// A connected player, as seen by the renamer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// Connection-scoped player id.
    pub id: PlayerId,
    /// Entity id of the player's avatar in its world.
    pub entity_id: u32,
    /// Display name.
    pub name: String,
    /// Name of the world the player is in.
    pub world: String,
}

impl Player {
    /// Creates a player whose entity id equals its player id.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, world: impl Into<String>) -> Self {
        Self {
            id,
            entity_id: id,
            name: name.into(),
            world: world.into(),
        }
    }
}

/// The mouse/keyboard gesture behind an inventory click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickType {
    /// Plain left click - picks up, places, or merges the whole cursor stack.
    Left,
    /// Plain right click - moves a single unit.
    Right,
    /// Shift + left click - quick-move to the other inventory.
    ShiftLeft,
    /// Shift + right click.
    ShiftRight,
    /// Middle click (creative clone).
    Middle,
    /// Number key swap with a hotbar slot.
    NumberKey(u8),
    /// Double click - gathers matching items onto the cursor.
    DoubleClick,
    /// Drop key.
    Drop,
}

impl ClickType {
    /// Returns true for right-button gestures.
    #[inline]
    #[must_use]
    pub const fn is_right_click(self) -> bool {
        matches!(self, Self::Right | Self::ShiftRight)
    }

    /// Returns true for gestures that touch more than the clicked slot and
    /// the cursor.
    #[inline]
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            Self::ShiftLeft | Self::ShiftRight | Self::DoubleClick | Self::NumberKey(_)
        )
    }
}

/// A player clicked a slot in an open inventory view.
#[derive(Clone, Debug)]
pub struct InventoryClickEvent {
    /// Who clicked.
    pub player: Player,
    /// Raw slot index in the view (-999 outside the window).
    pub raw_slot: i32,
    /// The gesture used.
    pub click: ClickType,
    /// The stack in the clicked slot before the click.
    pub current: Option<ItemStack>,
    /// The stack on the cursor before the click.
    pub cursor: Option<ItemStack>,
    /// Whether a listener cancelled the click.
    cancelled: bool,
}

impl InventoryClickEvent {
    /// Creates an uncancelled click event.
    #[must_use]
    pub fn new(
        player: Player,
        raw_slot: i32,
        click: ClickType,
        current: Option<ItemStack>,
        cursor: Option<ItemStack>,
    ) -> Self {
        Self {
            player,
            raw_slot,
            click,
            current,
            cursor,
            cancelled: false,
        }
    }

    /// Returns true if a listener cancelled the click.
    #[inline]
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancels (or un-cancels) the click.
    #[inline]
    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A player scrolled to a different hotbar slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeldItemChangeEvent {
    /// Who changed slot.
    pub player_id: PlayerId,
    /// Previously held hotbar slot.
    pub previous_slot: u8,
    /// Newly held hotbar slot.
    pub new_slot: u8,
}

/// A player finished joining.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerJoinEvent {
    /// Who joined.
    pub player: Player,
    /// Hotbar slot held on join.
    pub held_slot: u8,
}

/// A player disconnected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerQuitEvent {
    /// Who left.
    pub player_id: PlayerId,
}

/// Engine events delivered on the simulation context.
#[derive(Clone, Debug)]
pub enum GameEvent {
    /// See [`InventoryClickEvent`].
    InventoryClick(InventoryClickEvent),
    /// See [`HeldItemChangeEvent`].
    HeldItemChange(HeldItemChangeEvent),
    /// See [`PlayerJoinEvent`].
    PlayerJoin(PlayerJoinEvent),
    /// See [`PlayerQuitEvent`].
    PlayerQuit(PlayerQuitEvent),
}

impl GameEvent {
    /// Hands the event to the listener method matching its variant.
    pub fn dispatch(&mut self, listener: &dyn Listener) {
        match self {
            Self::InventoryClick(event) => listener.on_inventory_click(event),
            Self::HeldItemChange(event) => listener.on_held_item_change(event),
            Self::PlayerJoin(event) => listener.on_player_join(event),
            Self::PlayerQuit(event) => listener.on_player_quit(event),
        }
    }

    /// Returns true if this is a cancelled inventory click.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::InventoryClick(event) if event.is_cancelled())
    }
}

/// Receives engine events. One method per [`GameEvent`] variant.
pub trait Listener: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Called for every inventory click. May cancel it.
    fn on_inventory_click(&self, _event: &mut InventoryClickEvent) {}

    /// Called when a player changes hotbar slot.
    fn on_held_item_change(&self, _event: &HeldItemChangeEvent) {}

    /// Called when a player joins.
    fn on_player_join(&self, _event: &PlayerJoinEvent) {}

    /// Called when a player disconnects.
    fn on_player_quit(&self, _event: &PlayerQuitEvent) {}
}
