//! # Rule Resolution
//!
//! Turns `(pack, item id, damage)` into a [`DisplayOverride`].
//!
//! ## Tier Order
//!
//! ```text
//! name:  exact[damage].name ──► other.name ──► all.name ──► none
//! lore:  exact[damage].lore ──► other.lore ──► all.lore ──► none
//! ```
//!
//! The two fields walk the tiers independently, so a name can come from the
//! exact tier while the lore comes from `all`. An empty lore list counts as
//! "not set at this tier".

use itemrenamer_core::{Damage, ItemId};

use crate::rules::{DamageKey, DisplayOverride, DisplayRule, ItemRules, RuleTable};

impl ItemRules {
    /// The entries consulted for `damage`, most specific first.
    fn tiers(&self, damage: Damage) -> impl Iterator<Item = &DisplayRule> {
        [
            self.get(DamageKey::Exact(damage)),
            self.get(DamageKey::Other),
            self.get(DamageKey::All),
        ]
        .into_iter()
        .flatten()
    }

    /// Resolves the display for one damage value of this item.
    #[must_use]
    pub fn resolve(&self, damage: Damage) -> Option<DisplayOverride> {
        let name = self.tiers(damage).find_map(|rule| rule.name.clone());
        let lore = self
            .tiers(damage)
            .find(|rule| !rule.lore.is_empty())
            .map(|rule| rule.lore.clone());

        let display = DisplayOverride { name, lore };
        (!display.is_empty()).then_some(display)
    }
}

impl RuleTable {
    /// Resolves the display override for an item in a pack.
    ///
    /// Returns `None` when the pack or item is unknown, or when no tier sets
    /// either field.
    #[must_use]
    pub fn resolve(&self, pack: &str, item_id: ItemId, damage: Damage) -> Option<DisplayOverride> {
        self.pack(pack)?.item(item_id)?.resolve(damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden_rock() -> RuleTable {
        let mut table = RuleTable::new();
        table.insert("default", 1, DamageKey::All, DisplayRule::named("&6Golden Rock"));
        table.insert("default", 1, DamageKey::Exact(3), DisplayRule::named("&bSpecial Rock"));
        table
    }

    #[test]
    fn test_exact_entry_wins() {
        let display = golden_rock().resolve("default", 1, 3).unwrap();
        assert_eq!(display.name.as_deref(), Some("&bSpecial Rock"));
        assert_eq!(display.lore, None);
    }

    #[test]
    fn test_falls_through_to_all() {
        let display = golden_rock().resolve("default", 1, 7).unwrap();
        assert_eq!(display.name.as_deref(), Some("&6Golden Rock"));
    }

    #[test]
    fn test_other_beats_all() {
        let mut table = golden_rock();
        table.insert("default", 1, DamageKey::Other, DisplayRule::named("&7Plain Rock"));

        assert_eq!(table.resolve("default", 1, 7).unwrap().name.as_deref(), Some("&7Plain Rock"));
        assert_eq!(table.resolve("default", 1, 3).unwrap().name.as_deref(), Some("&bSpecial Rock"));
    }

    #[test]
    fn test_fields_resolve_independently() {
        let mut table = RuleTable::new();
        table.insert("default", 5, DamageKey::All, DisplayRule::with_lore(["&7from all"]));
        table.insert("default", 5, DamageKey::Exact(5), DisplayRule::named("&aFive"));

        let display = table.resolve("default", 5, 5).unwrap();
        assert_eq!(display.name.as_deref(), Some("&aFive"));
        assert_eq!(display.lore, Some(vec!["&7from all".to_owned()]));
    }

    #[test]
    fn test_empty_lore_falls_through() {
        let mut table = RuleTable::new();
        table.insert(
            "default",
            2,
            DamageKey::Exact(0),
            DisplayRule {
                name: Some("&cName".into()),
                lore: Vec::new(),
            },
        );
        table.insert("default", 2, DamageKey::Other, DisplayRule::with_lore(["&8other"]));

        let display = table.resolve("default", 2, 0).unwrap();
        assert_eq!(display.lore, Some(vec!["&8other".to_owned()]));
    }

    #[test]
    fn test_missing_everything_is_none() {
        let table = golden_rock();
        assert_eq!(table.resolve("nether", 1, 3), None);
        assert_eq!(table.resolve("default", 2, 3), None);

        let mut blank = RuleTable::new();
        blank.insert("default", 9, DamageKey::All, DisplayRule::default());
        assert_eq!(blank.resolve("default", 9, 0), None);
    }

    #[test]
    fn test_resolution_is_order_independent() {
        let table = golden_rock();
        let first = table.resolve("default", 1, 7);
        let _ = table.resolve("default", 1, 3);
        assert_eq!(table.resolve("default", 1, 7), first);
    }
}
