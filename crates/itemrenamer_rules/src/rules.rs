//! # Rename Packs
//!
//! The in-memory rule table: pack → item id → damage tier → display rule.
//!
//! ```text
//! RuleTable
//!   └── "default" (RenamePack)
//!         └── 1 (ItemRules)
//!               ├── exact: { 3 → "&bSpecial Rock" }
//!               ├── other: (none)
//!               └── all:   "&6Golden Rock"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use itemrenamer_core::{Damage, ItemId};
use serde::{Deserialize, Serialize};

use crate::error::RenamerError;

/// Which tier of an item's rules an entry lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DamageKey {
    /// Applies to exactly one damage value.
    Exact(Damage),
    /// Applies to damage values without an exact entry.
    Other,
    /// Applies to every damage value of the item.
    All,
}

impl FromStr for DamageKey {
    type Err = RenamerError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "other" => Ok(Self::Other),
            "all" => Ok(Self::All),
            number => number
                .parse()
                .map(Self::Exact)
                .map_err(|_| RenamerError::InvalidDamageKey(key.to_owned())),
        }
    }
}

impl fmt::Display for DamageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(damage) => write!(f, "{damage}"),
            Self::Other => f.write_str("other"),
            Self::All => f.write_str("all"),
        }
    }
}

/// One configured entry, exactly as written in the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRule {
    /// Raw name with `&` style codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw lore lines with `&` style codes. Empty means "not set here".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
}

impl DisplayRule {
    /// Creates a rule with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            lore: Vec::new(),
        }
    }

    /// Creates a rule with only lore.
    #[must_use]
    pub fn with_lore<I, S>(lore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            lore: lore.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the rule sets neither name nor lore.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.lore.is_empty()
    }
}

/// The resolved display for one item, still in raw `&` form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayOverride {
    /// Name, if any tier provided one.
    pub name: Option<String>,
    /// Lore, if any tier provided a non-empty list.
    pub lore: Option<Vec<String>>,
}

impl DisplayOverride {
    /// Returns true if neither field resolved.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.lore.is_none()
    }
}

/// All tiers configured for one item id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemRules {
    /// Entries for specific damage values.
    pub exact: BTreeMap<Damage, DisplayRule>,
    /// Entry for damage values without an exact entry.
    pub other: Option<DisplayRule>,
    /// Entry for every damage value.
    pub all: Option<DisplayRule>,
}

impl ItemRules {
    /// Gets the entry stored under a key.
    #[must_use]
    pub fn get(&self, key: DamageKey) -> Option<&DisplayRule> {
        match key {
            DamageKey::Exact(damage) => self.exact.get(&damage),
            DamageKey::Other => self.other.as_ref(),
            DamageKey::All => self.all.as_ref(),
        }
    }

    /// Gets or creates the entry stored under a key.
    pub fn entry(&mut self, key: DamageKey) -> &mut DisplayRule {
        match key {
            DamageKey::Exact(damage) => self.exact.entry(damage).or_default(),
            DamageKey::Other => self.other.get_or_insert_with(DisplayRule::default),
            DamageKey::All => self.all.get_or_insert_with(DisplayRule::default),
        }
    }

    /// Removes the entry stored under a key.
    pub fn remove(&mut self, key: DamageKey) -> Option<DisplayRule> {
        match key {
            DamageKey::Exact(damage) => self.exact.remove(&damage),
            DamageKey::Other => self.other.take(),
            DamageKey::All => self.all.take(),
        }
    }

    /// Iterates over every configured entry with its key.
    pub fn iter(&self) -> impl Iterator<Item = (DamageKey, &DisplayRule)> {
        self.exact
            .iter()
            .map(|(damage, rule)| (DamageKey::Exact(*damage), rule))
            .chain(self.other.iter().map(|rule| (DamageKey::Other, rule)))
            .chain(self.all.iter().map(|rule| (DamageKey::All, rule)))
    }

    /// Returns true if no tier holds an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.other.is_none() && self.all.is_none()
    }
}

/// A named set of rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenamePack {
    /// Rules indexed by item id.
    pub items: BTreeMap<ItemId, ItemRules>,
}

impl RenamePack {
    /// Gets the rules for an item.
    #[inline]
    #[must_use]
    pub fn item(&self, item_id: ItemId) -> Option<&ItemRules> {
        self.items.get(&item_id)
    }
}

/// Every pack, indexed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTable {
    packs: BTreeMap<String, RenamePack>,
}

impl RuleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a pack by name.
    #[inline]
    #[must_use]
    pub fn pack(&self, name: &str) -> Option<&RenamePack> {
        self.packs.get(name)
    }

    /// Returns true if a pack with this name exists.
    #[inline]
    #[must_use]
    pub fn has_pack(&self, name: &str) -> bool {
        self.packs.contains_key(name)
    }

    /// Iterates over pack names.
    pub fn pack_names(&self) -> impl Iterator<Item = &str> {
        self.packs.keys().map(String::as_str)
    }

    /// Iterates over packs.
    pub fn packs(&self) -> impl Iterator<Item = (&str, &RenamePack)> {
        self.packs.iter().map(|(name, pack)| (name.as_str(), pack))
    }

    /// Stores a rule, replacing any previous entry under the same key.
    pub fn insert(&mut self, pack: &str, item_id: ItemId, key: DamageKey, rule: DisplayRule) {
        *self.rules_mut(pack, item_id).entry(key) = rule;
    }

    /// Sets the name of an entry, creating the entry if needed.
    pub fn set_name(
        &mut self,
        pack: &str,
        item_id: ItemId,
        key: DamageKey,
        name: impl Into<String>,
    ) {
        self.rules_mut(pack, item_id).entry(key).name = Some(name.into());
    }

    /// Replaces the lore of an entry, creating the entry if needed.
    pub fn set_lore(&mut self, pack: &str, item_id: ItemId, key: DamageKey, lore: Vec<String>) {
        self.rules_mut(pack, item_id).entry(key).lore = lore;
    }

    /// Appends one lore line to an entry, creating the entry if needed.
    pub fn add_lore(
        &mut self,
        pack: &str,
        item_id: ItemId,
        key: DamageKey,
        line: impl Into<String>,
    ) {
        self.rules_mut(pack, item_id).entry(key).lore.push(line.into());
    }

    /// Removes an entry. Items and packs left empty are dropped too.
    pub fn clear(&mut self, pack: &str, item_id: ItemId, key: DamageKey) -> Option<DisplayRule> {
        let rules = self.packs.get_mut(pack)?;
        let items = &mut rules.items;
        let removed = items.get_mut(&item_id)?.remove(key);

        if items.get(&item_id).is_some_and(ItemRules::is_empty) {
            items.remove(&item_id);
        }
        if items.is_empty() {
            self.packs.remove(pack);
        }
        removed
    }

    /// Creates an empty pack if it does not exist yet.
    pub fn ensure_pack(&mut self, pack: &str) -> &mut RenamePack {
        self.packs.entry(pack.to_owned()).or_default()
    }

    fn rules_mut(&mut self, pack: &str, item_id: ItemId) -> &mut ItemRules {
        self.ensure_pack(pack).items.entry(item_id).or_default()
    }
}
