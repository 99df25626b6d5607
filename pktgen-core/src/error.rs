//! Error types for pktgen-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the packet schema. All are fatal: no artifact
/// is touched after one of these.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("cannot read schema at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error with file path and line context from serde_yaml.
    #[error("failed to parse schema at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The top-level key is absent from the document.
    #[error("schema at {path} has no top-level '{key}' collection")]
    MissingCollection { path: PathBuf, key: String },

    /// The top-level key is present but null or an empty list.
    #[error("schema at {path}: '{key}' collection is empty")]
    EmptyCollection { path: PathBuf, key: String },
}

/// Errors raised while loading `pktgen.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML serialization error (writing a default config).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
