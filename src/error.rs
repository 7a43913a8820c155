//! Error types for the configuration store.
//!
//! # Taxonomy
//! - [`StoreError`]: returned by the store itself (unknown section, parse
//!   failure, missing snapshot on a carrier, duplicate registration)
//! - [`SectionError`]: the cause a section parser reports for a bad bundle
//! - [`LoadError`]: reading a raw bundle from disk failed
//!
//! # Design Decisions
//! - Every error is returned synchronously to the immediate caller
//! - Nothing is retried here; retry belongs to whoever delivers updates

use thiserror::Error;

/// Errors surfaced by the snapshot store and its carriers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update arrived for a name with no registered parser.
    #[error("unknown config section {0:?}")]
    UnknownSection(String),

    /// The section's raw bundle could not be parsed. The prior value is kept.
    #[error("failed to parse config section {section:?}: {source}")]
    ParseError {
        section: String,
        #[source]
        source: SectionError,
    },

    /// A carrier was asked for a snapshot it never had attached.
    #[error("no config snapshot attached to carrier")]
    SnapshotRetrieval,

    /// Two parsers were registered under the same name.
    #[error("config section {0:?} registered twice")]
    DuplicateSection(String),
}

/// Why a section parser rejected a raw bundle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionError {
    #[error("missing required key {0:?}")]
    MissingKey(String),

    #[error("invalid value {value:?} for key {key:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl SectionError {
    /// Shorthand for an [`SectionError::InvalidValue`].
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        SectionError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error type for loading a raw bundle from a file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unsupported value for key {key:?}: only scalars are allowed")]
    UnsupportedValue { key: String },

    #[error("cannot derive a section name from {0:?}")]
    InvalidName(std::path::PathBuf),
}

/// Error type for the file watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watch error: {0}")]
    Notify(#[from] notify::Error),
}
