//! # Rules Error Types
//!
//! All errors that can occur while loading, editing, or saving rename rules.
//!
//! Resolution itself never fails: a missing or malformed entry simply means
//! "no override".

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the rules system.
#[derive(Error, Debug)]
pub enum RenamerError {
    /// The configuration document is not valid TOML, or has the wrong shape
    /// at the top level.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written back out.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the configuration file failed.
    #[error("configuration file {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration was created in memory and has no file behind it.
    #[error("configuration has no backing file")]
    NoBackingFile,

    /// An item id key is not a number.
    #[error("invalid item id: {0}")]
    InvalidItemId(String),

    /// A damage key is neither a number, `other`, nor `all`.
    #[error("invalid damage key: {0}")]
    InvalidDamageKey(String),
}

/// Result type for rules operations.
pub type RenamerResult<T> = Result<T, RenamerError>;
