//! # Protocol Error Types

use thiserror::Error;

use crate::packets::PacketType;

/// Errors that can occur while intercepting outgoing packets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A replacement did not supply one entry per embedded stack.
    #[error("{packet:?} carries {expected} stack(s), got {actual} replacement(s)")]
    StackCountMismatch {
        /// Packet being rewritten.
        packet: PacketType,
        /// Stacks embedded in the packet.
        expected: usize,
        /// Replacements supplied.
        actual: usize,
    },

    /// The packet has a shape no client would accept.
    #[error("malformed {packet:?} packet: {reason}")]
    MalformedPacket {
        /// Packet being inspected.
        packet: PacketType,
        /// What is wrong with it.
        reason: String,
    },

    /// The network layer stopped receiving packets.
    #[error("outbound channel closed")]
    ChannelClosed,
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
