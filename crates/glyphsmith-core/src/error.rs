//! Error types for glyphsmith-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for glyphsmith-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in glyphsmith-core
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or contradictory build option
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of what's invalid
        message: String,
    },

    /// Input root could not be enumerated
    #[error("cannot read icons from {}: {message}", path.display())]
    Discovery {
        /// Directory (or entry) that failed
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// Two icon files resolve to the same icon name
    #[error("duplicate icon name '{name}': {} and {}", first.display(), second.display())]
    DuplicateName {
        /// The colliding icon name
        name: String,
        /// First file deriving the name
        first: PathBuf,
        /// Second file deriving the name
        second: PathBuf,
    },

    /// The icon set does not fit in the code point range
    #[error("cannot allocate code point for icon #{index}: range U+{start:04X}..=U+{end:04X} is exhausted")]
    AllocationOverflow {
        /// Zero-based position of the first icon that did not fit
        index: usize,
        /// First code point of the range
        start: u32,
        /// Last code point of the range
        end: u32,
    },

    /// A web artifact could not be written
    #[error("failed to write {}: {source}", path.display())]
    ArtifactWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Template rendering error
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a YAML configuration file
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
