//! # ItemRenamer Guard
//!
//! Keeps renamed items from being merged into stacks the server would not
//! allow.
//!
//! ## Architecture
//!
//! ```text
//! InventoryClickEvent ──► StackIdentityGuard::evaluate
//!                              │
//!                              ├── RenameProcessor (clicked slot, held slot context)
//!                              ├── RenameProcessor (cursor, no slot)
//!                              ▼
//!                         GuardVerdict ──► cancel or allow
//! ```
//!
//! The guard is a plain [`itemrenamer_core::Listener`]; turning it on and off
//! is a matter of registering or unregistering it on the event bus.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod restrictor;

pub use restrictor::{AllowReason, GuardVerdict, StackIdentityGuard};
