//! # Rename Processor
//!
//! Produces the client-visible copy of a stack.
//!
//! ```text
//! &ItemStack ──► effective pack ──► resolve ──┬── none ──► Cow::Borrowed(input)
//!                                             └── some ──► clone + merge_absent
//!                                                             └─► Cow::Owned(copy)
//! ```
//!
//! The input is never mutated. Name and Lore are only written when the stack
//! has no value for them yet, so processing an already processed stack
//! changes nothing.

use std::borrow::Cow;
use std::sync::Arc;

use itemrenamer_core::{
    merge_absent, Compound, ItemStack, Player, SlotContext, Tag, DISPLAY_KEY, LORE_KEY, NAME_KEY,
};

use crate::config::{RenamerConfig, RenamerSettings};
use crate::rules::DisplayOverride;
use crate::style::{render_lore_line, render_name};

/// Applies the active rename rules to item stacks.
#[derive(Clone, Debug)]
pub struct RenameProcessor {
    config: Arc<RenamerConfig>,
}

impl RenameProcessor {
    /// Creates a processor reading from a configuration store.
    #[must_use]
    pub fn new(config: Arc<RenamerConfig>) -> Self {
        Self { config }
    }

    /// The configuration store this processor reads from.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Arc<RenamerConfig> {
        &self.config
    }

    /// Returns the stack as `player` should see it.
    ///
    /// The whole call runs against one settings snapshot. `slot` is
    /// `SlotContext::NONE` for stacks that are not in a slot, such as the
    /// cursor.
    #[must_use]
    pub fn process<'a>(
        &self,
        player: &Player,
        stack: &'a ItemStack,
        slot: SlotContext,
    ) -> Cow<'a, ItemStack> {
        let settings = self.config.snapshot();
        process_with(&settings, player, stack, slot)
    }
}

/// Processes a stack against an explicit settings snapshot.
#[must_use]
pub fn process_with<'a>(
    settings: &RenamerSettings,
    player: &Player,
    stack: &'a ItemStack,
    slot: SlotContext,
) -> Cow<'a, ItemStack> {
    if stack.is_empty() {
        return Cow::Borrowed(stack);
    }

    let Some(display) = settings.resolve_for_world(&player.world, stack.type_id, stack.damage)
    else {
        return Cow::Borrowed(stack);
    };

    tracing::trace!(
        "Renaming {}:{} for {} at slot {}",
        stack.type_id,
        stack.damage,
        player.name,
        slot.raw()
    );
    Cow::Owned(apply_override(stack, &display))
}

/// Writes a resolved override into a copy of `stack`.
///
/// Existing Name and Lore values win over the override.
#[must_use]
pub fn apply_override(stack: &ItemStack, display: &DisplayOverride) -> ItemStack {
    let mut patch = Compound::new();
    if let Some(name) = &display.name {
        patch.insert(NAME_KEY, render_name(name));
    }
    if let Some(lore) = &display.lore {
        let lines = lore
            .iter()
            .map(|line| Tag::String(render_lore_line(line)))
            .collect();
        patch.insert(LORE_KEY, Tag::List(lines));
    }

    let patch = Compound::new().with(DISPLAY_KEY, patch);
    let tag = match &stack.tag {
        Some(existing) => merge_absent(existing, &patch),
        None => patch,
    };

    let mut copy = stack.clone();
    copy.tag = Some(tag);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{DamageKey, DisplayRule};

    fn processor() -> RenameProcessor {
        let mut settings = RenamerSettings {
            default_pack: Some("default".into()),
            ..RenamerSettings::default()
        };
        settings
            .rules
            .insert("default", 1, DamageKey::All, DisplayRule::named("&6Golden Rock"));
        settings.rules.insert(
            "default",
            1,
            DamageKey::Exact(3),
            DisplayRule {
                name: Some("&bSpecial Rock".into()),
                lore: vec!["&7Found deep".into()],
            },
        );
        RenameProcessor::new(Arc::new(RenamerConfig::from_settings(settings)))
    }

    fn player() -> Player {
        Player::new(7, "Steve", "world")
    }

    #[test]
    fn test_unmatched_stack_is_borrowed() {
        let stack = ItemStack::new(2, 0, 1);
        let out = processor().process(&player(), &stack, SlotContext::new(0));
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_stack_is_borrowed() {
        let stack = ItemStack::empty();
        let out = processor().process(&player(), &stack, SlotContext::NONE);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_rename_writes_rendered_display() {
        let stack = ItemStack::new(1, 3, 16);
        let out = processor().process(&player(), &stack, SlotContext::new(4));

        assert_eq!(out.display_name(), Some("§r§bSpecial Rock§r"));
        assert_eq!(out.lore(), Some(vec!["§7Found deep§r"]));
        assert_eq!(out.count, 16);
        assert_eq!(stack.tag, None);
    }

    #[test]
    fn test_existing_name_is_kept() {
        let display = Compound::new().with(NAME_KEY, "Anvil Name");
        let stack = ItemStack::new(1, 7, 1).with_tag(Compound::new().with(DISPLAY_KEY, display));
        let out = processor().process(&player(), &stack, SlotContext::NONE);

        assert_eq!(out.display_name(), Some("Anvil Name"));
        assert_eq!(stack.display_name(), Some("Anvil Name"));
    }

    #[test]
    fn test_process_is_idempotent() {
        let processor = processor();
        let stack = ItemStack::new(1, 3, 1);
        let once = processor.process(&player(), &stack, SlotContext::NONE).into_owned();
        let twice = processor.process(&player(), &once, SlotContext::NONE).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_other_tag_keys_survive() {
        let tag = Compound::new().with("ench", Tag::List(vec![Tag::Short(16)]));
        let stack = ItemStack::new(1, 0, 1).with_tag(tag);
        let out = processor().process(&player(), &stack, SlotContext::NONE);

        let tag = out.tag.as_ref().unwrap();
        assert!(tag.contains_key("ench"));
        assert_eq!(out.display_name(), Some("§r§6Golden Rock§r"));
    }
}
