//! # Outgoing Packets
//!
//! The item-bearing packets the server sends to a client.
//!
//! ## Packet Types
//!
//! | Packet          | Stacks                  | Slot context            |
//! |-----------------|-------------------------|-------------------------|
//! | WindowItems     | one per window slot     | the slot index          |
//! | SetSlot         | one                     | the slot, or cursor     |
//! | EntityEquipment | one                     | held slot or none       |
//! | Raw             | none                    | -                       |
//!
//! Interceptors treat every packet as an opaque container through
//! [`ItemCarrier`]: read the embedded stacks, then replace all of them in one
//! call. A replacement either applies completely or not at all.

use itemrenamer_core::ItemStack;

use crate::error::{ProtocolError, ProtocolResult};

/// Largest slot count a window packet can carry; the count is a signed
/// short on the wire.
pub const MAX_WINDOW_SLOTS: usize = 32_767;

/// Slot value that addresses the cursor in a single-slot update.
pub const CURSOR_SLOT: i16 = -1;

/// Equipment slot of the item held in the main hand.
pub const MAIN_HAND_SLOT: u8 = 0;

/// Packet type discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PacketType {
    /// Full contents of an open window.
    WindowItems,
    /// One slot of an open window, or the cursor.
    SetSlot,
    /// One equipment slot of an entity.
    EntityEquipment,
    /// Anything that carries no stacks.
    Raw,
}

/// A packet on its way from the engine to one client.
#[derive(Clone, Debug, PartialEq)]
pub enum OutgoingPacket {
    /// Full window contents, indexed by slot.
    WindowItems {
        /// Window the contents belong to (0 = player inventory).
        window_id: u8,
        /// One entry per slot; `None` for an empty slot.
        items: Vec<Option<ItemStack>>,
    },
    /// A single slot update.
    SetSlot {
        /// Window id, -1 when addressing the cursor.
        window_id: i8,
        /// Slot index, -1 when addressing the cursor.
        slot: i16,
        /// New slot contents.
        item: Option<ItemStack>,
    },
    /// What an entity is holding or wearing.
    EntityEquipment {
        /// Entity whose equipment changed.
        entity_id: u32,
        /// Equipment slot (0 = main hand, 1-4 = armor).
        equipment_slot: u8,
        /// New contents.
        item: Option<ItemStack>,
    },
    /// Any other packet, passed through untouched.
    Raw {
        /// Wire id.
        packet_id: u8,
        /// Encoded body.
        payload: Vec<u8>,
    },
}

/// Where an embedded stack sits, from the receiving client's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPosition {
    /// A window slot.
    Slot(u16),
    /// The cursor.
    Cursor,
    /// An entity's equipment slot.
    Equipment {
        /// Entity wearing or holding the stack.
        entity_id: u32,
        /// Equipment slot.
        equipment_slot: u8,
    },
}

/// A stack read out of a packet, with its position.
#[derive(Clone, Copy, Debug)]
pub struct EmbeddedStack<'a> {
    /// Where the stack sits.
    pub position: StackPosition,
    /// The stack, `None` for an empty slot.
    pub stack: Option<&'a ItemStack>,
}

/// Read/replace access to the stacks inside a packet.
pub trait ItemCarrier {
    /// Returns every embedded stack in packet order.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::MalformedPacket` if the packet shape is invalid.
    fn read_stacks(&self) -> ProtocolResult<Vec<EmbeddedStack<'_>>>;

    /// Replaces every embedded stack, in the order `read_stacks` returned them.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::StackCountMismatch` if `stacks` does not hold
    /// exactly one entry per embedded stack. The packet is unchanged on error.
    fn replace_stacks(&mut self, stacks: Vec<Option<ItemStack>>) -> ProtocolResult<()>;
}

impl OutgoingPacket {
    /// Returns the packet type.
    #[must_use]
    pub const fn packet_type(&self) -> PacketType {
        match self {
            Self::WindowItems { .. } => PacketType::WindowItems,
            Self::SetSlot { .. } => PacketType::SetSlot,
            Self::EntityEquipment { .. } => PacketType::EntityEquipment,
            Self::Raw { .. } => PacketType::Raw,
        }
    }

    /// Returns true if the packet can carry item stacks.
    #[inline]
    #[must_use]
    pub const fn is_item_bearing(&self) -> bool {
        !matches!(self, Self::Raw { .. })
    }

    fn malformed(&self, reason: impl Into<String>) -> ProtocolError {
        ProtocolError::MalformedPacket {
            packet: self.packet_type(),
            reason: reason.into(),
        }
    }

    fn single_position(&self) -> ProtocolResult<Option<StackPosition>> {
        match *self {
            Self::WindowItems { ref items, .. } => {
                if items.len() > MAX_WINDOW_SLOTS {
                    return Err(self.malformed(format!("{} slots", items.len())));
                }
                Ok(None)
            }
            Self::SetSlot { slot: CURSOR_SLOT, .. } => Ok(Some(StackPosition::Cursor)),
            Self::SetSlot { slot, .. } => u16::try_from(slot)
                .map(|slot| Some(StackPosition::Slot(slot)))
                .map_err(|_| self.malformed(format!("slot {slot}"))),
            Self::EntityEquipment {
                entity_id,
                equipment_slot,
                ..
            } => Ok(Some(StackPosition::Equipment {
                entity_id,
                equipment_slot,
            })),
            Self::Raw { .. } => Ok(None),
        }
    }
}

impl ItemCarrier for OutgoingPacket {
    fn read_stacks(&self) -> ProtocolResult<Vec<EmbeddedStack<'_>>> {
        let position = self.single_position()?;
        match self {
            Self::WindowItems { items, .. } => Ok(items
                .iter()
                .zip(0u16..)
                .map(|(stack, slot)| EmbeddedStack {
                    position: StackPosition::Slot(slot),
                    stack: stack.as_ref(),
                })
                .collect()),
            Self::SetSlot { item, .. } | Self::EntityEquipment { item, .. } => {
                Ok(position
                    .map(|position| EmbeddedStack {
                        position,
                        stack: item.as_ref(),
                    })
                    .into_iter()
                    .collect())
            }
            Self::Raw { .. } => Ok(Vec::new()),
        }
    }

    fn replace_stacks(&mut self, mut stacks: Vec<Option<ItemStack>>) -> ProtocolResult<()> {
        let packet = self.packet_type();
        let mismatch = |expected: usize, actual: usize| ProtocolError::StackCountMismatch {
            packet,
            expected,
            actual,
        };

        match self {
            Self::WindowItems { items, .. } => {
                if stacks.len() != items.len() {
                    return Err(mismatch(items.len(), stacks.len()));
                }
                *items = stacks;
            }
            Self::SetSlot { item, .. } | Self::EntityEquipment { item, .. } => {
                if stacks.len() != 1 {
                    return Err(mismatch(1, stacks.len()));
                }
                *item = stacks.pop().flatten();
            }
            Self::Raw { .. } => {
                if !stacks.is_empty() {
                    return Err(mismatch(0, stacks.len()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone(count: u32) -> Option<ItemStack> {
        Some(ItemStack::new(1, 0, count))
    }

    #[test]
    fn test_window_items_positions() {
        let packet = OutgoingPacket::WindowItems {
            window_id: 0,
            items: vec![stone(1), None, stone(3)],
        };
        let stacks = packet.read_stacks().unwrap();

        assert_eq!(stacks.len(), 3);
        assert_eq!(stacks[2].position, StackPosition::Slot(2));
        assert!(stacks[1].stack.is_none());
    }

    #[test]
    fn test_set_slot_cursor() {
        let packet = OutgoingPacket::SetSlot {
            window_id: -1,
            slot: CURSOR_SLOT,
            item: stone(1),
        };
        let stacks = packet.read_stacks().unwrap();
        assert_eq!(stacks[0].position, StackPosition::Cursor);
    }

    #[test]
    fn test_malformed_shapes() {
        let bad_slot = OutgoingPacket::SetSlot {
            window_id: 0,
            slot: -7,
            item: stone(1),
        };
        assert!(matches!(
            bad_slot.read_stacks(),
            Err(ProtocolError::MalformedPacket { packet: PacketType::SetSlot, .. })
        ));

        let huge = OutgoingPacket::WindowItems {
            window_id: 1,
            items: vec![None; MAX_WINDOW_SLOTS + 1],
        };
        assert!(huge.read_stacks().is_err());

        let large = OutgoingPacket::WindowItems {
            window_id: 2,
            items: vec![stone(1); 1_000],
        };
        assert_eq!(large.read_stacks().unwrap().len(), 1_000);
    }

    #[test]
    fn test_replace_requires_matching_count() {
        let mut packet = OutgoingPacket::WindowItems {
            window_id: 0,
            items: vec![stone(1), stone(2)],
        };
        let before = packet.clone();

        let result = packet.replace_stacks(vec![stone(5)]);
        assert_eq!(
            result,
            Err(ProtocolError::StackCountMismatch {
                packet: PacketType::WindowItems,
                expected: 2,
                actual: 1,
            })
        );
        assert_eq!(packet, before);

        packet.replace_stacks(vec![None, stone(9)]).unwrap();
        assert_eq!(packet.read_stacks().unwrap()[1].stack.map(|s| s.count), Some(9));
    }

    #[test]
    fn test_raw_packets_carry_nothing() {
        let mut packet = OutgoingPacket::Raw {
            packet_id: 0x03,
            payload: vec![1, 2, 3],
        };
        assert!(!packet.is_item_bearing());
        assert!(packet.read_stacks().unwrap().is_empty());
        assert!(packet.replace_stacks(vec![stone(1)]).is_err());
    }
}
