//! # Plugin Error Types

use itemrenamer_protocol::ProtocolError;
use itemrenamer_rules::RenamerError;
use thiserror::Error;

/// Errors surfaced by the plugin context and its API.
#[derive(Error, Debug)]
pub enum PluginError {
    /// Loading, reloading, or saving the configuration failed.
    #[error("configuration error: {0}")]
    Config(#[from] RenamerError),

    /// The packet layer rejected an operation.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The plugin has been disabled; the API handle is stale.
    #[error("ItemRenamer is disabled")]
    Disabled,
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;
