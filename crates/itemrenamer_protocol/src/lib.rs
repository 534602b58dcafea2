//! # ItemRenamer Protocol
//!
//! Renames items at the last moment: on the outgoing copy of each packet,
//! after the engine has built it and before the network layer encodes it.
//!
//! ## Trust Model
//!
//! ```text
//! ENGINE (authoritative stacks)          CLIENT
//!   │                                       │
//!   │── WindowItems (true stacks) ──┐       │
//!   │                               ▼       │
//!   │                     PacketRewriter    │
//!   │                               │       │
//!   │                               └──────►│ renamed copies
//! ```
//!
//! The engine keeps operating on true identities. Only what the client sees
//! changes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use itemrenamer_protocol::{PacketPipeline, PacketRewriter};
//!
//! let (pipeline, network_rx) = PacketPipeline::bounded(4096);
//! let id = pipeline.register(Arc::new(PacketRewriter::new(processor, tracker)));
//! pipeline.send(&player, packet)?;
//! pipeline.unregister(id);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod packets;
pub mod pipeline;
pub mod rewriter;

pub use error::{ProtocolError, ProtocolResult};
pub use packets::{
    EmbeddedStack, ItemCarrier, OutgoingPacket, PacketType, StackPosition, CURSOR_SLOT,
    MAIN_HAND_SLOT, MAX_WINDOW_SLOTS,
};
pub use pipeline::{InterceptorId, OutboundPacket, PacketInterceptor, PacketPipeline};
pub use rewriter::PacketRewriter;
