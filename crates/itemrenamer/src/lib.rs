//! # ItemRenamer
//!
//! Client-side item renaming for game servers: every player sees items named
//! and described by configurable packs, while the server keeps working with
//! the true items.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                            ITEMRENAMER                               │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌────────────────┐  │
//! │  │ itemrenamer_    │     │ itemrenamer_    │     │ itemrenamer_   │  │
//! │  │ rules           │────>│ protocol        │     │ guard          │  │
//! │  │                 │     │                 │     │                │  │
//! │  │ • Config        │     │ • Pipeline      │     │ • Click guard  │  │
//! │  │ • Resolver      │────────────────────────────>│                │  │
//! │  │ • Processor     │     │ • Rewriter      │     │                │  │
//! │  └────────┬────────┘     └────────┬────────┘     └───────┬────────┘  │
//! │           │                       │                      │           │
//! │           └───────────────────────┼──────────────────────┘           │
//! │                                   ▼                                  │
//! │                      ┌─────────────────────────┐                     │
//! │                      │ itemrenamer_core        │                     │
//! │                      │ • Item / tag model      │                     │
//! │                      │ • Events / listeners    │                     │
//! │                      │ • Snapshot, tracker     │                     │
//! │                      └─────────────────────────┘                     │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use itemrenamer::{EventBus, ItemRenamer, RenamerOptions};
//! use itemrenamer_protocol::PacketPipeline;
//!
//! let (pipeline, network_rx) = PacketPipeline::bounded(4096);
//! let bus = Arc::new(EventBus::default());
//! let renamer = ItemRenamer::enable_from_file(
//!     "plugins/ItemRenamer/config.toml",
//!     server,
//!     Arc::new(pipeline),
//!     Arc::clone(&bus),
//!     RenamerOptions::default(),
//! )?;
//!
//! let api = renamer.api();
//! // ...
//! renamer.disable()?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod api;
pub mod bus;
pub mod error;
pub mod plugin;
pub mod refresh;
pub mod server;

// Re-export the units
pub use itemrenamer_core as core;
pub use itemrenamer_guard as guard;
pub use itemrenamer_protocol as protocol;
pub use itemrenamer_rules as rules;

pub use api::RenamerApi;
pub use bus::{EventBus, ListenerId};
pub use error::{PluginError, PluginResult};
pub use plugin::{ItemRenamer, RenamerOptions, WorldStatus};
pub use refresh::{RefreshHandle, RefreshInventoryTask, DEFAULT_REFRESH_PERIOD};
pub use server::ServerHandle;
