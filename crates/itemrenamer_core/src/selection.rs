//! # Selected Slot Tracking
//!
//! Remembers which hotbar slot every connected player is holding.
//!
//! Written on the simulation context (held-item changes, joins, quits) and
//! read on the network context while packets are rewritten, so entries sit
//! behind a `parking_lot::RwLock`.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::events::{HeldItemChangeEvent, Listener, PlayerId, PlayerJoinEvent, PlayerQuitEvent};
use crate::item::SlotContext;
use crate::HOTBAR_SLOTS;

/// Per-player held slot table.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    held: RwLock<HashMap<PlayerId, u8>>,
}

impl SelectionTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the slot a player is holding.
    ///
    /// Out-of-range slots are ignored and the previous entry is kept.
    pub fn record(&self, player: PlayerId, slot: u8) {
        if slot >= HOTBAR_SLOTS {
            tracing::warn!("Ignoring held slot {} for player {}", slot, player);
            return;
        }
        self.held.write().insert(player, slot);
    }

    /// Forgets a player.
    pub fn clear(&self, player: PlayerId) {
        self.held.write().remove(&player);
    }

    /// Returns the held slot of a player, if known.
    #[inline]
    #[must_use]
    pub fn held_slot(&self, player: PlayerId) -> Option<u8> {
        self.held.read().get(&player).copied()
    }

    /// Returns the held slot as a slot context, or [`SlotContext::NONE`] for
    /// players the tracker has not seen.
    #[inline]
    #[must_use]
    pub fn slot_context(&self, player: PlayerId) -> SlotContext {
        self.held_slot(player)
            .map_or(SlotContext::NONE, SlotContext::from)
    }

    /// Number of players currently tracked.
    #[must_use]
    pub fn tracked_players(&self) -> usize {
        self.held.read().len()
    }
}

impl Listener for SelectionTracker {
    fn name(&self) -> &'static str {
        "selection-tracker"
    }

    fn on_held_item_change(&self, event: &HeldItemChangeEvent) {
        self.record(event.player_id, event.new_slot);
    }

    fn on_player_join(&self, event: &PlayerJoinEvent) {
        self.record(event.player.id, event.held_slot);
    }

    fn on_player_quit(&self, event: &PlayerQuitEvent) {
        self.clear(event.player_id);
    }
}
