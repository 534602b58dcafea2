//! Integration test for the rewriting pipeline.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use itemrenamer_core::{ItemStack, Player, SelectionTracker};
use itemrenamer_protocol::{
    OutgoingPacket, PacketInterceptor, PacketPipeline, PacketRewriter, ProtocolResult,
    CURSOR_SLOT, MAIN_HAND_SLOT,
};
use itemrenamer_rules::{DamageKey, DisplayRule, RenameProcessor, RenamerConfig, RenamerSettings};

fn processor() -> RenameProcessor {
    let mut settings = RenamerSettings {
        default_pack: Some("default".into()),
        ..RenamerSettings::default()
    };
    settings.worlds.insert("world_nether".into(), "nether".into());
    settings
        .rules
        .insert("default", 1, DamageKey::All, DisplayRule::named("&6Golden Rock"));
    settings
        .rules
        .insert("nether", 1, DamageKey::All, DisplayRule::named("&cHot Rock"));
    RenameProcessor::new(Arc::new(RenamerConfig::from_settings(settings)))
}

fn name_of(packet: &OutgoingPacket) -> Option<String> {
    match packet {
        OutgoingPacket::SetSlot { item, .. } | OutgoingPacket::EntityEquipment { item, .. } => {
            item.as_ref()?.display_name().map(str::to_owned)
        }
        _ => None,
    }
}

#[test]
fn test_rename_depends_on_receiver_world() {
    let (pipeline, outbound) = PacketPipeline::unbounded();
    let tracker = Arc::new(SelectionTracker::new());
    pipeline.register(Arc::new(PacketRewriter::new(processor(), tracker)));

    let packet = OutgoingPacket::SetSlot {
        window_id: -1,
        slot: CURSOR_SLOT,
        item: Some(ItemStack::new(1, 0, 1)),
    };
    pipeline.send(&Player::new(1, "Alex", "world"), packet.clone()).unwrap();
    pipeline.send(&Player::new(2, "Sam", "world_nether"), packet).unwrap();

    let overworld = outbound.recv().unwrap();
    let nether = outbound.recv().unwrap();
    assert_eq!(overworld.receiver, 1);
    assert_eq!(name_of(&overworld.packet).as_deref(), Some("§r§6Golden Rock§r"));
    assert_eq!(name_of(&nether.packet).as_deref(), Some("§r§cHot Rock§r"));
}

#[test]
fn test_equipment_and_raw_packets() {
    let (pipeline, outbound) = PacketPipeline::unbounded();
    let tracker = Arc::new(SelectionTracker::new());
    pipeline.register(Arc::new(PacketRewriter::new(processor(), tracker)));
    let viewer = Player::new(1, "Alex", "world");

    let equipment = OutgoingPacket::EntityEquipment {
        entity_id: 40,
        equipment_slot: MAIN_HAND_SLOT,
        item: Some(ItemStack::new(1, 2, 1)),
    };
    let raw = OutgoingPacket::Raw {
        packet_id: 0x1f,
        payload: vec![0xde, 0xad],
    };
    pipeline.send(&viewer, equipment).unwrap();
    pipeline.send(&viewer, raw.clone()).unwrap();

    assert_eq!(
        name_of(&outbound.recv().unwrap().packet).as_deref(),
        Some("§r§6Golden Rock§r")
    );
    assert_eq!(outbound.recv().unwrap().packet, raw);
}

/// Counts passes and checks no pass ever runs after unregistration returned.
struct Probe {
    passes: AtomicUsize,
    retired: AtomicBool,
}

impl PacketInterceptor for Probe {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn intercept(&self, _: &Player, _: &mut OutgoingPacket) -> ProtocolResult<()> {
        assert!(!self.retired.load(Ordering::Acquire), "pass after unregister");
        self.passes.fetch_add(1, Ordering::Relaxed);
        thread::yield_now();
        Ok(())
    }
}

#[test]
fn test_unregister_waits_for_in_flight_passes() {
    let (pipeline, outbound) = PacketPipeline::unbounded();
    let pipeline = Arc::new(pipeline);
    let probe = Arc::new(Probe {
        passes: AtomicUsize::new(0),
        retired: AtomicBool::new(false),
    });
    let id = pipeline.register(Arc::clone(&probe) as Arc<dyn PacketInterceptor>);

    let senders: Vec<_> = (0..4u32)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            thread::spawn(move || {
                let player = Player::new(i, "sender", "world");
                for _ in 0..500 {
                    let packet = OutgoingPacket::Raw {
                        packet_id: 0,
                        payload: Vec::new(),
                    };
                    pipeline.send(&player, packet).unwrap();
                }
            })
        })
        .collect();

    while probe.passes.load(Ordering::Relaxed) < 10 {
        thread::yield_now();
    }
    assert!(pipeline.unregister(id));
    probe.retired.store(true, Ordering::Release);

    for sender in senders {
        sender.join().unwrap();
    }
    assert_eq!(pipeline.interceptor_count(), 0);
    assert_eq!(outbound.len(), 2000);
}
