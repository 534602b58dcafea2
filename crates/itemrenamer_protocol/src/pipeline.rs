//! # Packet Pipeline
//!
//! The hook between the engine and the network layer.
//!
//! ```text
//! Engine ──send()──► [read lock] interceptor 1 ──► interceptor 2 ──► ... [unlock]
//!                                                                        │
//!                                              crossbeam channel ◄───────┘
//!                                                     │
//!                                                     ▼
//!                                              Network I/O thread
//! ```
//!
//! `send` holds the registry's read lock for its whole interception pass.
//! `unregister` takes the write lock, so it returns only after every pass
//! that could still see the interceptor has finished, and no later pass
//! will see it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use itemrenamer_core::{Player, PlayerId};
use parking_lot::RwLock;

use crate::error::{ProtocolError, ProtocolResult};
use crate::packets::OutgoingPacket;

/// Handle returned by [`PacketPipeline::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InterceptorId(u64);

/// Something that inspects and may rewrite outgoing packets.
pub trait PacketInterceptor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Inspects, and possibly rewrites, a packet bound for `receiver`.
    ///
    /// # Errors
    ///
    /// An error means the packet was not changed. The pipeline logs it and
    /// forwards the packet as it was.
    fn intercept(&self, receiver: &Player, packet: &mut OutgoingPacket) -> ProtocolResult<()>;
}

/// A packet that made it through interception.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundPacket {
    /// Player the packet is addressed to.
    pub receiver: PlayerId,
    /// The packet as it goes on the wire.
    pub packet: OutgoingPacket,
}

/// Ordered interceptor registry plus the outbound queue.
pub struct PacketPipeline {
    interceptors: RwLock<Vec<(InterceptorId, Arc<dyn PacketInterceptor>)>>,
    next_id: AtomicU64,
    outbound: Sender<OutboundPacket>,
}

impl PacketPipeline {
    /// Creates a pipeline that forwards into an existing sender.
    #[must_use]
    pub fn new(outbound: Sender<OutboundPacket>) -> Self {
        Self {
            interceptors: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            outbound,
        }
    }

    /// Creates a pipeline with a bounded queue, returning the network side.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<OutboundPacket>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self::new(sender), receiver)
    }

    /// Creates a pipeline with an unbounded queue, returning the network side.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<OutboundPacket>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    /// Appends an interceptor. It sees every packet sent after this returns.
    pub fn register(&self, interceptor: Arc<dyn PacketInterceptor>) -> InterceptorId {
        let id = InterceptorId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!("Registering packet interceptor {} ({:?})", interceptor.name(), id);
        self.interceptors.write().push((id, interceptor));
        id
    }

    /// Removes an interceptor, waiting for in-flight passes to finish.
    ///
    /// Returns false if the id was not registered.
    pub fn unregister(&self, id: InterceptorId) -> bool {
        let mut interceptors = self.interceptors.write();
        let Some(index) = interceptors.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        let (_, interceptor) = interceptors.remove(index);
        tracing::debug!("Unregistered packet interceptor {} ({:?})", interceptor.name(), id);
        true
    }

    /// Number of registered interceptors.
    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.read().len()
    }

    /// Runs `packet` through every interceptor, then queues it for `receiver`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::ChannelClosed` if the network side has hung up.
    pub fn send(&self, receiver: &Player, packet: OutgoingPacket) -> ProtocolResult<()> {
        let packet = self.intercept(receiver, packet);
        self.outbound
            .send(OutboundPacket {
                receiver: receiver.id,
                packet,
            })
            .map_err(|_| ProtocolError::ChannelClosed)
    }

    /// Runs the interception pass without queueing the result.
    #[must_use]
    pub fn intercept(&self, receiver: &Player, mut packet: OutgoingPacket) -> OutgoingPacket {
        let interceptors = self.interceptors.read();
        for (_, interceptor) in interceptors.iter() {
            if let Err(error) = interceptor.intercept(receiver, &mut packet) {
                tracing::warn!(
                    "{} failed on {:?} for {}, forwarding unmodified: {}",
                    interceptor.name(),
                    packet.packet_type(),
                    receiver.name,
                    error
                );
            }
        }
        packet
    }
}

impl std::fmt::Debug for PacketPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketPipeline")
            .field("interceptors", &self.interceptor_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemrenamer_core::ItemStack;

    struct Doubler;

    impl PacketInterceptor for Doubler {
        fn name(&self) -> &'static str {
            "doubler"
        }

        fn intercept(&self, _: &Player, packet: &mut OutgoingPacket) -> ProtocolResult<()> {
            if let OutgoingPacket::SetSlot { item: Some(item), .. } = packet {
                item.count *= 2;
            }
            Ok(())
        }
    }

    struct Broken;

    impl PacketInterceptor for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn intercept(&self, _: &Player, packet: &mut OutgoingPacket) -> ProtocolResult<()> {
            Err(ProtocolError::MalformedPacket {
                packet: packet.packet_type(),
                reason: "always".into(),
            })
        }
    }

    fn set_slot(count: u32) -> OutgoingPacket {
        OutgoingPacket::SetSlot {
            window_id: 0,
            slot: 36,
            item: Some(ItemStack::new(1, 0, count)),
        }
    }

    #[test]
    fn test_register_and_unregister() {
        let (pipeline, outbound) = PacketPipeline::unbounded();
        let player = Player::new(1, "Alex", "world");

        let id = pipeline.register(Arc::new(Doubler));
        pipeline.send(&player, set_slot(3)).unwrap();
        assert!(pipeline.unregister(id));
        assert!(!pipeline.unregister(id));
        pipeline.send(&player, set_slot(3)).unwrap();

        assert_eq!(outbound.recv().unwrap().packet, set_slot(6));
        assert_eq!(outbound.recv().unwrap().packet, set_slot(3));
    }

    #[test]
    fn test_failing_interceptor_forwards_unmodified() {
        let (pipeline, outbound) = PacketPipeline::unbounded();
        let player = Player::new(1, "Alex", "world");
        pipeline.register(Arc::new(Broken));

        pipeline.send(&player, set_slot(3)).unwrap();
        let sent = outbound.recv().unwrap();
        assert_eq!(sent.receiver, 1);
        assert_eq!(sent.packet, set_slot(3));
    }

    #[test]
    fn test_closed_channel() {
        let (pipeline, outbound) = PacketPipeline::bounded(1);
        drop(outbound);
        let player = Player::new(1, "Alex", "world");
        assert_eq!(pipeline.send(&player, set_slot(1)), Err(ProtocolError::ChannelClosed));
    }
}
