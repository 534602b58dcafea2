//! # Packet Rewriter
//!
//! Substitutes renamed copies for every stack an outgoing packet carries.
//!
//! ## Slot Context
//!
//! ```text
//! StackPosition::Slot(i)                              ──► i
//! StackPosition::Cursor                               ──► NONE
//! StackPosition::Equipment { receiver's own, hand }   ──► tracked held slot
//! StackPosition::Equipment { anything else }          ──► NONE
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use itemrenamer_core::{ItemStack, Player, SelectionTracker, SlotContext};
use itemrenamer_rules::{process_with, RenameProcessor};

use crate::error::ProtocolResult;
use crate::packets::{ItemCarrier, OutgoingPacket, StackPosition, MAIN_HAND_SLOT};
use crate::pipeline::PacketInterceptor;

/// Rewrites outgoing packets with renamed stacks.
#[derive(Debug)]
pub struct PacketRewriter {
    processor: RenameProcessor,
    tracker: Arc<SelectionTracker>,
}

impl PacketRewriter {
    /// Creates a rewriter.
    #[must_use]
    pub fn new(processor: RenameProcessor, tracker: Arc<SelectionTracker>) -> Self {
        Self { processor, tracker }
    }

    /// Slot context for a stack at `position` in a packet sent to `receiver`.
    #[must_use]
    pub fn slot_context(&self, receiver: &Player, position: StackPosition) -> SlotContext {
        match position {
            StackPosition::Slot(slot) => SlotContext::new(i32::from(slot)),
            StackPosition::Cursor => SlotContext::NONE,
            StackPosition::Equipment {
                entity_id,
                equipment_slot: MAIN_HAND_SLOT,
            } if entity_id == receiver.entity_id => self.tracker.slot_context(receiver.id),
            StackPosition::Equipment { .. } => SlotContext::NONE,
        }
    }

    /// Rewrites `packet` in place. Returns true if any stack changed.
    ///
    /// Every stack in the packet is processed against the same settings
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns the packet's shape error. The packet is untouched in that case.
    pub fn rewrite(&self, receiver: &Player, packet: &mut OutgoingPacket) -> ProtocolResult<bool> {
        if !packet.is_item_bearing() {
            return Ok(false);
        }

        let settings = self.processor.config().snapshot();
        let replacements: Vec<Option<ItemStack>> = {
            let embedded = packet.read_stacks()?;
            let mut changed = false;
            let replacements = embedded
                .iter()
                .map(|entry| {
                    let stack = entry.stack?;
                    let slot = self.slot_context(receiver, entry.position);
                    match process_with(&settings, receiver, stack, slot) {
                        Cow::Borrowed(original) => Some(original.clone()),
                        Cow::Owned(renamed) => {
                            changed = true;
                            Some(renamed)
                        }
                    }
                })
                .collect();
            if !changed {
                return Ok(false);
            }
            replacements
        };

        packet.replace_stacks(replacements)?;
        Ok(true)
    }
}

impl PacketInterceptor for PacketRewriter {
    fn name(&self) -> &'static str {
        "item-renamer"
    }

    fn intercept(&self, receiver: &Player, packet: &mut OutgoingPacket) -> ProtocolResult<()> {
        self.rewrite(receiver, packet).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use itemrenamer_rules::{DamageKey, DisplayRule, RenamerConfig, RenamerSettings};

    fn rewriter() -> (PacketRewriter, Arc<SelectionTracker>) {
        let mut settings = RenamerSettings {
            default_pack: Some("default".into()),
            ..RenamerSettings::default()
        };
        settings
            .rules
            .insert("default", 1, DamageKey::All, DisplayRule::named("&6Golden Rock"));
        let processor = RenameProcessor::new(Arc::new(RenamerConfig::from_settings(settings)));
        let tracker = Arc::new(SelectionTracker::new());
        (PacketRewriter::new(processor, Arc::clone(&tracker)), tracker)
    }

    #[test]
    fn test_window_items_rewritten() {
        let (rewriter, _) = rewriter();
        let player = Player::new(1, "Alex", "world");
        let original = ItemStack::new(1, 0, 32);
        let mut packet = OutgoingPacket::WindowItems {
            window_id: 0,
            items: vec![Some(original.clone()), None, Some(ItemStack::new(2, 0, 1))],
        };

        assert!(rewriter.rewrite(&player, &mut packet).unwrap());

        let stacks = packet.read_stacks().unwrap();
        assert_eq!(stacks[0].stack.unwrap().display_name(), Some("§r§6Golden Rock§r"));
        assert!(stacks[1].stack.is_none());
        assert_eq!(stacks[2].stack.unwrap().tag, None);
        assert_eq!(original.tag, None);
    }

    #[test]
    fn test_unmatched_packet_is_not_rebuilt() {
        let (rewriter, _) = rewriter();
        let player = Player::new(1, "Alex", "world");
        let mut packet = OutgoingPacket::SetSlot {
            window_id: 0,
            slot: 5,
            item: Some(ItemStack::new(3, 0, 1)),
        };
        let before = packet.clone();

        assert!(!rewriter.rewrite(&player, &mut packet).unwrap());
        assert_eq!(packet, before);
    }

    #[test]
    fn test_malformed_packet_is_untouched() {
        let (rewriter, _) = rewriter();
        let player = Player::new(1, "Alex", "world");
        let mut packet = OutgoingPacket::SetSlot {
            window_id: 0,
            slot: -4,
            item: Some(ItemStack::new(1, 0, 1)),
        };
        let before = packet.clone();

        assert!(matches!(
            rewriter.rewrite(&player, &mut packet),
            Err(ProtocolError::MalformedPacket { .. })
        ));
        assert_eq!(packet, before);
    }

    #[test]
    fn test_slot_context_mapping() {
        let (rewriter, tracker) = rewriter();
        let player = Player::new(1, "Alex", "world");
        tracker.record(1, 4);

        assert_eq!(rewriter.slot_context(&player, StackPosition::Slot(12)), SlotContext::new(12));
        assert_eq!(rewriter.slot_context(&player, StackPosition::Cursor), SlotContext::NONE);

        let own_hand = StackPosition::Equipment {
            entity_id: player.entity_id,
            equipment_slot: MAIN_HAND_SLOT,
        };
        assert_eq!(rewriter.slot_context(&player, own_hand), SlotContext::new(4));

        let other_hand = StackPosition::Equipment {
            entity_id: 99,
            equipment_slot: MAIN_HAND_SLOT,
        };
        assert_eq!(rewriter.slot_context(&player, other_hand), SlotContext::NONE);

        let own_helmet = StackPosition::Equipment {
            entity_id: player.entity_id,
            equipment_slot: 4,
        };
        assert_eq!(rewriter.slot_context(&player, own_helmet), SlotContext::NONE);
    }
}
