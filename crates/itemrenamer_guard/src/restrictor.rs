//! # Stack Identity Guard
//!
//! The client stacks items by what it sees; the server stacks them by what
//! they are. Once two different items render the same, a left click can ask
//! the server to merge stacks the client believes compatible.
//!
//! ## Decision
//!
//! ```text
//! already cancelled?               ──► allow (not ours to judge)
//! clicked slot or cursor empty?    ──► allow
//! cursor count == 0?               ──► allow
//! right click?                     ──► allow (moves a single unit)
//! perceived(current) == perceived(cursor)?
//!     yes                          ──► allow
//!     no                           ──► cancel
//! ```
//!
//! `perceived` is the renamed copy with its count set to 1. Both stacks of
//! one click are renamed against the same settings snapshot.
//!
//! ## Known Limitation
//!
//! Shift-click, double-click, and number-key swaps move stacks between
//! slots other than the clicked one and the cursor. They are evaluated like
//! any other left-button gesture and are not otherwise handled.

use itemrenamer_core::{
    is_empty_slot, InventoryClickEvent, ItemStack, Listener, Player, SelectionTracker, SlotContext,
};
use itemrenamer_rules::{process_with, strip_codes, RenameProcessor, RenamerSettings};
use std::sync::Arc;

/// Why a click was let through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllowReason {
    /// Another listener already cancelled the click.
    AlreadyCancelled,
    /// The clicked slot or the cursor holds nothing.
    EmptyStack,
    /// The cursor stack has a zero count.
    ZeroCursor,
    /// Right clicks move one unit at a time.
    RightClick,
    /// Both stacks look the same to the client.
    SameIdentity,
}

/// Outcome of evaluating one click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Let the click through.
    Allowed(AllowReason),
    /// Cancel the click.
    Cancelled,
}

impl GuardVerdict {
    /// Returns true if the click must be cancelled.
    #[inline]
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Cancels merges whose client-perceived identities differ.
#[derive(Debug)]
pub struct StackIdentityGuard {
    processor: RenameProcessor,
    tracker: Arc<SelectionTracker>,
}

impl StackIdentityGuard {
    /// Creates a guard.
    #[must_use]
    pub fn new(processor: RenameProcessor, tracker: Arc<SelectionTracker>) -> Self {
        Self { processor, tracker }
    }

    /// Decides whether a click may proceed. Does not modify the event.
    #[must_use]
    pub fn evaluate(&self, event: &InventoryClickEvent) -> GuardVerdict {
        if event.is_cancelled() {
            return GuardVerdict::Allowed(AllowReason::AlreadyCancelled);
        }

        let (Some(current), Some(cursor)) = (event.current.as_ref(), event.cursor.as_ref()) else {
            return GuardVerdict::Allowed(AllowReason::EmptyStack);
        };
        if is_empty_slot(Some(current)) || is_empty_slot(Some(cursor)) {
            return GuardVerdict::Allowed(AllowReason::EmptyStack);
        }
        if cursor.count == 0 {
            return GuardVerdict::Allowed(AllowReason::ZeroCursor);
        }
        if event.click.is_right_click() {
            return GuardVerdict::Allowed(AllowReason::RightClick);
        }

        let settings = self.processor.config().snapshot();
        let held = self.tracker.slot_context(event.player.id);
        let current = perceived(&settings, &event.player, current, held);
        let cursor = perceived(&settings, &event.player, cursor, SlotContext::NONE);

        if current == cursor {
            GuardVerdict::Allowed(AllowReason::SameIdentity)
        } else {
            GuardVerdict::Cancelled
        }
    }

    /// The stack as the client sees it under the active settings, count
    /// normalized to 1.
    #[must_use]
    pub fn perceived(&self, player: &Player, stack: &ItemStack, slot: SlotContext) -> ItemStack {
        perceived(&self.processor.config().snapshot(), player, stack, slot)
    }
}

fn perceived(
    settings: &RenamerSettings,
    player: &Player,
    stack: &ItemStack,
    slot: SlotContext,
) -> ItemStack {
    let mut seen = process_with(settings, player, stack, slot).into_owned();
    seen.count = 1;
    seen
}

/// Plain-text label of a stack for logs.
fn describe(stack: Option<&ItemStack>) -> String {
    match stack {
        Some(stack) => match stack.display_name() {
            Some(name) => format!("{}:{} \"{}\"", stack.type_id, stack.damage, strip_codes(name)),
            None => format!("{}:{}", stack.type_id, stack.damage),
        },
        None => "nothing".to_owned(),
    }
}

impl Listener for StackIdentityGuard {
    fn name(&self) -> &'static str {
        "stack-identity-guard"
    }

    fn on_inventory_click(&self, event: &mut InventoryClickEvent) {
        if !self.evaluate(event).is_cancelled() {
            return;
        }

        if event.click.is_composite() {
            tracing::debug!(
                "Cancelled {:?} by {} at raw slot {}: judged on the clicked slot only",
                event.click,
                event.player.name,
                event.raw_slot
            );
        } else {
            tracing::debug!(
                "Cancelled click by {} at raw slot {}: {} and {} differ to the client",
                event.player.name,
                event.raw_slot,
                describe(event.current.as_ref()),
                describe(event.cursor.as_ref())
            );
        }
        event.set_cancelled(true);
    }
}
