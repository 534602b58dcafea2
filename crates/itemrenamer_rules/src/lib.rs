//! # ItemRenamer Rules
//!
//! Rename packs, tiered resolution, and the processor that writes the result
//! into a copy of a stack.
//!
//! ## Data Flow
//!
//! ```text
//! config.toml ──► RenamerSettings ──► Snapshot (RenamerConfig)
//!                                          │ load()
//!                                          ▼
//!   (player, stack, slot) ──► RenameProcessor ──► effective pack
//!                                          │
//!                                          ▼
//!                             RuleTable::resolve ──► DisplayOverride
//!                                          │
//!                                          ▼
//!                             apply_override ──► Cow<ItemStack>
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use itemrenamer_rules::{RenamerConfig, RenameProcessor};
//!
//! let config = Arc::new(RenamerConfig::load("plugins/ItemRenamer/config.toml")?);
//! let processor = RenameProcessor::new(config);
//! let visible = processor.process(&player, &stack, SlotContext::new(3));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod processor;
pub mod resolver;
pub mod rules;
pub mod style;

pub use config::{parse_item_id, RenamerConfig, RenamerSettings};
pub use error::{RenamerError, RenamerResult};
pub use processor::{apply_override, process_with, RenameProcessor};
pub use rules::{DamageKey, DisplayOverride, DisplayRule, ItemRules, RenamePack, RuleTable};
pub use style::{render_lore_line, render_name, strip_codes, translate_alternate_codes};
