//! # Configuration
//!
//! Packs, world bindings, and flags, loaded from TOML.
//!
//! ## File Format
//!
//! ```toml
//! default_pack = "default"
//! auto_update = false
//! stack_restrictor = true
//!
//! [worlds]
//! world_nether = "nether"
//!
//! [packs.default.1.all]
//! name = "&6Golden Rock"
//!
//! [packs.default.1.3]
//! name = "&bSpecial Rock"
//! lore = ["&7Found deep", "&7underground"]
//! ```
//!
//! ## Hot Reload
//!
//! [`RenamerConfig`] keeps the active [`RenamerSettings`] in a `Snapshot`.
//! Reloads and edits build a complete new settings value and swap it in, so a
//! reader sees either the old table or the new one, never a mix.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use itemrenamer_core::{Damage, ItemId, Snapshot};
use serde::{Deserialize, Serialize};

use crate::error::{RenamerError, RenamerResult};
use crate::rules::{DamageKey, DisplayOverride, DisplayRule, ItemRules, RuleTable};

/// On-disk shape of the configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_pack: Option<String>,
    #[serde(default)]
    auto_update: bool,
    #[serde(default = "default_stack_restrictor")]
    stack_restrictor: bool,
    #[serde(default)]
    worlds: BTreeMap<String, String>,
    #[serde(default)]
    packs: BTreeMap<String, toml::Table>,
}

const fn default_stack_restrictor() -> bool {
    true
}

/// One complete, immutable version of the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenamerSettings {
    /// Pack used by worlds without their own binding.
    pub default_pack: Option<String>,
    /// Whether the host should check for plugin updates.
    pub auto_update: bool,
    /// Whether the stack identity guard is active.
    pub stack_restrictor: bool,
    /// World name → pack name.
    pub worlds: BTreeMap<String, String>,
    /// The rename rules.
    pub rules: RuleTable,
}

impl Default for RenamerSettings {
    fn default() -> Self {
        Self {
            default_pack: None,
            auto_update: false,
            stack_restrictor: default_stack_restrictor(),
            worlds: BTreeMap::new(),
            rules: RuleTable::new(),
        }
    }
}

impl RenamerSettings {
    /// Parses settings from a TOML document.
    ///
    /// Individual entries with a bad item id, bad damage key, or wrong shape
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `RenamerError::Parse` if the document is not valid TOML or its
    /// top-level keys have the wrong types.
    pub fn from_toml_str(text: &str) -> RenamerResult<Self> {
        let document: ConfigDocument = toml::from_str(text)?;

        let mut rules = RuleTable::new();
        for (pack, items) in document.packs {
            rules.ensure_pack(&pack);
            for (item_key, tiers) in items {
                load_item(&mut rules, &pack, &item_key, tiers);
            }
        }

        Ok(Self {
            default_pack: document.default_pack,
            auto_update: document.auto_update,
            stack_restrictor: document.stack_restrictor,
            worlds: document.worlds,
            rules,
        })
    }

    /// Serializes the settings back into a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `RenamerError::Serialize` if a value cannot be represented.
    pub fn to_toml_string(&self) -> RenamerResult<String> {
        let mut packs = BTreeMap::new();
        for (name, pack) in self.rules.packs() {
            let mut items = toml::Table::new();
            for (item_id, rules) in &pack.items {
                items.insert(item_id.to_string(), toml::Value::Table(item_table(rules)?));
            }
            packs.insert(name.to_owned(), items);
        }

        let document = ConfigDocument {
            default_pack: self.default_pack.clone(),
            auto_update: self.auto_update,
            stack_restrictor: self.stack_restrictor,
            worlds: self.worlds.clone(),
            packs,
        };
        Ok(toml::to_string_pretty(&document)?)
    }

    /// Returns the pack a world renames with: its own binding, else the
    /// default pack.
    #[must_use]
    pub fn effective_pack(&self, world: &str) -> Option<&str> {
        self.worlds
            .get(world)
            .map(String::as_str)
            .or(self.default_pack.as_deref())
    }

    /// Worlds with an explicit binding.
    pub fn world_keys(&self) -> impl Iterator<Item = &str> {
        self.worlds.keys().map(String::as_str)
    }

    /// Resolves the display for an item as seen from a world.
    #[must_use]
    pub fn resolve_for_world(
        &self,
        world: &str,
        item_id: ItemId,
        damage: Damage,
    ) -> Option<DisplayOverride> {
        self.rules.resolve(self.effective_pack(world)?, item_id, damage)
    }
}

fn load_item(rules: &mut RuleTable, pack: &str, item_key: &str, tiers: toml::Value) {
    let item_id = match parse_item_id(item_key) {
        Ok(id) => id,
        Err(error) => {
            tracing::warn!("Pack {}: {}, skipping", pack, error);
            return;
        }
    };
    let toml::Value::Table(tiers) = tiers else {
        tracing::warn!("Pack {}: item {} is not a table, skipping", pack, item_id);
        return;
    };

    for (tier_key, value) in tiers {
        let key = match tier_key.parse::<DamageKey>() {
            Ok(key) => key,
            Err(error) => {
                tracing::warn!("Pack {}: item {}: {}, skipping", pack, item_id, error);
                continue;
            }
        };
        match value.try_into::<DisplayRule>() {
            Ok(rule) => rules.insert(pack, item_id, key, rule),
            Err(error) => {
                tracing::warn!("Pack {}: item {}.{}: {}, skipping", pack, item_id, key, error);
            }
        }
    }
}

/// Parses an item id key.
///
/// # Errors
///
/// Returns `RenamerError::InvalidItemId` if the key is not an unsigned number.
pub fn parse_item_id(key: &str) -> RenamerResult<ItemId> {
    key.trim()
        .parse()
        .map_err(|_| RenamerError::InvalidItemId(key.to_owned()))
}

fn item_table(rules: &ItemRules) -> RenamerResult<toml::Table> {
    let mut table = toml::Table::new();
    for (key, rule) in rules.iter() {
        table.insert(key.to_string(), toml::Value::try_from(rule)?);
    }
    Ok(table)
}

/// The live configuration store.
///
/// Readers call [`RenamerConfig::snapshot`] once per operation and work
/// against that version until they are done.
#[derive(Debug)]
pub struct RenamerConfig {
    /// File the settings came from, if any.
    path: Option<PathBuf>,
    /// Active settings.
    settings: Snapshot<RenamerSettings>,
    /// Number of in-process edits since creation.
    modifications: AtomicU64,
}

impl RenamerConfig {
    /// Wraps in-memory settings that have no backing file.
    #[must_use]
    pub fn from_settings(settings: RenamerSettings) -> Self {
        Self {
            path: None,
            settings: Snapshot::new(settings),
            modifications: AtomicU64::new(0),
        }
    }

    /// Loads settings from a file.
    ///
    /// # Errors
    ///
    /// Returns `RenamerError::Io` if the file cannot be read and
    /// `RenamerError::Parse` if it is not a valid document.
    pub fn load(path: impl AsRef<Path>) -> RenamerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let settings = read_settings(&path)?;
        tracing::info!(
            "Loaded {} rename pack(s) from {}",
            settings.rules.pack_names().count(),
            path.display()
        );

        Ok(Self {
            path: Some(path),
            settings: Snapshot::new(settings),
            modifications: AtomicU64::new(0),
        })
    }

    /// Returns the active settings.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<RenamerSettings> {
        self.settings.load()
    }

    /// Number of swaps performed so far (reloads, applies, edits).
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.settings.generation()
    }

    /// Number of in-process edits not loaded from disk.
    #[inline]
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        self.modifications.load(Ordering::Acquire)
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns true if the stack identity guard should be active.
    #[must_use]
    pub fn has_stack_restrictor(&self) -> bool {
        self.snapshot().stack_restrictor
    }

    /// Replaces the active settings in one swap.
    pub fn apply(&self, settings: RenamerSettings) -> Arc<RenamerSettings> {
        self.settings.store(settings)
    }

    /// Re-reads the backing file and swaps the result in.
    ///
    /// On any error the active settings are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RenamerError::NoBackingFile` for in-memory configurations,
    /// otherwise the errors of [`RenamerConfig::load`].
    pub fn reload(&self) -> RenamerResult<()> {
        let path = self.path.as_ref().ok_or(RenamerError::NoBackingFile)?;
        let settings = read_settings(path)?;
        self.apply(settings);
        tracing::info!("Reloaded configuration from {}", path.display());
        Ok(())
    }

    /// Applies an in-process edit and publishes the result.
    pub fn edit<F>(&self, change: F) -> Arc<RenamerSettings>
    where
        F: FnOnce(&mut RenamerSettings),
    {
        let next = self.settings.update(|current| {
            let mut next = current.clone();
            change(&mut next);
            next
        });
        self.modifications.fetch_add(1, Ordering::AcqRel);
        next
    }

    /// Sets the name of an entry.
    pub fn set_name(&self, pack: &str, item_id: ItemId, key: DamageKey, name: &str) {
        self.edit(|settings| settings.rules.set_name(pack, item_id, key, name));
    }

    /// Replaces the lore of an entry.
    pub fn set_lore(&self, pack: &str, item_id: ItemId, key: DamageKey, lore: Vec<String>) {
        self.edit(|settings| settings.rules.set_lore(pack, item_id, key, lore));
    }

    /// Appends a lore line to an entry.
    pub fn add_lore(&self, pack: &str, item_id: ItemId, key: DamageKey, line: &str) {
        self.edit(|settings| settings.rules.add_lore(pack, item_id, key, line));
    }

    /// Removes an entry, returning it if it existed.
    ///
    /// Clearing a missing entry publishes nothing and does not count as a
    /// modification.
    pub fn clear_entry(&self, pack: &str, item_id: ItemId, key: DamageKey) -> Option<DisplayRule> {
        let mut removed = None;
        self.settings.try_update(|current| {
            let mut next = current.clone();
            removed = next.rules.clear(pack, item_id, key);
            removed.is_some().then_some(next)
        })?;
        self.modifications.fetch_add(1, Ordering::AcqRel);
        removed
    }

    /// Binds a world to a pack.
    pub fn bind_world(&self, world: &str, pack: &str) {
        self.edit(|settings| {
            settings.worlds.insert(world.to_owned(), pack.to_owned());
        });
    }

    /// Writes the active settings to the backing file.
    ///
    /// # Errors
    ///
    /// Returns `RenamerError::NoBackingFile` for in-memory configurations,
    /// and `Serialize`/`Io` errors from writing.
    pub fn save(&self) -> RenamerResult<()> {
        let path = self.path.as_ref().ok_or(RenamerError::NoBackingFile)?;
        let text = self.snapshot().to_toml_string()?;
        std::fs::write(path, text).map_err(|source| RenamerError::Io {
            path: path.clone(),
            source,
        })
    }
}

fn read_settings(path: &Path) -> RenamerResult<RenamerSettings> {
    let text = std::fs::read_to_string(path).map_err(|source| RenamerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RenamerSettings::from_toml_str(&text)
}
