//! Integration test for the merge exploit the guard exists to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use itemrenamer_core::{
    ClickType, Compound, GameEvent, InventoryClickEvent, ItemStack, Listener, Player,
    SelectionTracker, DISPLAY_KEY, NAME_KEY,
};
use itemrenamer_guard::{AllowReason, GuardVerdict, StackIdentityGuard};
use itemrenamer_rules::{DamageKey, DisplayRule, RenameProcessor, RenamerConfig, RenamerSettings};

/// Two damage variants renamed to the same text: identical to the client,
/// different to the server.
fn lookalike_guard() -> (StackIdentityGuard, Arc<RenamerConfig>) {
    let mut settings = RenamerSettings {
        default_pack: Some("default".into()),
        ..RenamerSettings::default()
    };
    settings
        .rules
        .insert("default", 35, DamageKey::All, DisplayRule::named("&fWool"));
    let config = Arc::new(RenamerConfig::from_settings(settings));
    let guard = StackIdentityGuard::new(
        RenameProcessor::new(Arc::clone(&config)),
        Arc::new(SelectionTracker::new()),
    );
    (guard, config)
}

fn merge(current: ItemStack, cursor: ItemStack, click: ClickType) -> GameEvent {
    GameEvent::InventoryClick(InventoryClickEvent::new(
        Player::new(3, "Riley", "world"),
        20,
        click,
        Some(current),
        Some(cursor),
    ))
}

#[test]
fn test_lookalike_variants_cannot_be_merged() {
    let (guard, _) = lookalike_guard();

    let mut event = merge(ItemStack::new(35, 0, 40), ItemStack::new(35, 14, 40), ClickType::Left);
    event.dispatch(&guard);
    assert!(event.is_cancelled());

    // Picking up one unit at a time stays legal
    let mut event = merge(ItemStack::new(35, 0, 40), ItemStack::new(35, 14, 40), ClickType::Right);
    event.dispatch(&guard);
    assert!(!event.is_cancelled());
}

#[test]
fn test_true_duplicates_merge_freely() {
    let (guard, _) = lookalike_guard();
    let mut event = merge(ItemStack::new(35, 14, 40), ItemStack::new(35, 14, 24), ClickType::Left);
    event.dispatch(&guard);
    assert!(!event.is_cancelled());
}

#[test]
fn test_verdict_follows_live_configuration() {
    let (guard, config) = lookalike_guard();
    let display = Compound::new().with(NAME_KEY, "§r§fWool§r");
    let named = ItemStack::new(35, 14, 1).with_tag(Compound::new().with(DISPLAY_KEY, display));

    let event = InventoryClickEvent::new(
        Player::new(3, "Riley", "world"),
        20,
        ClickType::Left,
        Some(ItemStack::new(35, 14, 1)),
        Some(named),
    );
    assert_eq!(guard.evaluate(&event), GuardVerdict::Allowed(AllowReason::SameIdentity));

    assert!(config.clear_entry("default", 35, DamageKey::All).is_some());
    assert_eq!(guard.evaluate(&event), GuardVerdict::Cancelled);
    assert_eq!(guard.name(), "stack-identity-guard");
}

fn named_everywhere(name: &str) -> RenamerSettings {
    let mut settings = RenamerSettings {
        default_pack: Some("default".into()),
        ..RenamerSettings::default()
    };
    settings
        .rules
        .insert("default", 1, DamageKey::All, DisplayRule::named(name));
    settings
}

#[test]
fn test_click_is_judged_against_one_table_version() {
    let config = Arc::new(RenamerConfig::from_settings(named_everywhere("&aA")));
    let guard = StackIdentityGuard::new(
        RenameProcessor::new(Arc::clone(&config)),
        Arc::new(SelectionTracker::new()),
    );
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let config = Arc::clone(&config);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut flip = false;
            while !done.load(Ordering::Acquire) {
                config.apply(named_everywhere(if flip { "&aA" } else { "&bB" }));
                flip = !flip;
            }
        })
    };

    while config.generation() == 0 {
        thread::yield_now();
    }

    // Same identity under every version, so no version mix may cancel it
    let event = InventoryClickEvent::new(
        Player::new(3, "Riley", "world"),
        20,
        ClickType::Left,
        Some(ItemStack::new(1, 0, 10)),
        Some(ItemStack::new(1, 0, 5)),
    );
    let cancelled = (0..50_000)
        .filter(|_| guard.evaluate(&event).is_cancelled())
        .count();

    done.store(true, Ordering::Release);
    writer.join().unwrap();

    assert_eq!(cancelled, 0);
}
