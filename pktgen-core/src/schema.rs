//! Schema loader.
//!
//! The document is a mapping with one top-level key (default `Packet`) whose
//! value is an ordered sequence of packet records:
//!
//! ```yaml
//! Packet:
//!   - Type: RequestPacket
//!     PacketName: Ping
//!   - Type: ReplyPacket
//!     PacketName: Pong
//!     Items:
//!       - Type: int
//!         Name: code
//! ```
//!
//! Only shape is checked here; invariants live in [`crate::validate`].

use std::path::Path;

use serde_yaml::Value;

use crate::error::SchemaError;
use crate::types::{PacketDefinition, Schema};

/// Default top-level key of the schema document.
pub const DEFAULT_SCHEMA_KEY: &str = "Packet";

/// Load and parse the schema at `path`, reading packets from `key`.
///
/// Fails fast with [`SchemaError::MissingCollection`] or
/// [`SchemaError::EmptyCollection`] before any validation happens.
pub fn load_at(path: &Path, key: &str) -> Result<Schema, SchemaError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&contents, key, path)
}

/// Parse schema text. `origin` is only used for error messages.
pub fn parse_str(contents: &str, key: &str, origin: &Path) -> Result<Schema, SchemaError> {
    let parse_err = |source| SchemaError::Parse {
        path: origin.to_path_buf(),
        source,
    };

    let document: Value = serde_yaml::from_str(contents).map_err(parse_err)?;
    let missing = || SchemaError::MissingCollection {
        path: origin.to_path_buf(),
        key: key.to_owned(),
    };

    // An empty file parses to Null; treat it like a missing key.
    let Value::Mapping(mapping) = document else {
        return Err(missing());
    };
    let Some(collection) = mapping.get(key) else {
        return Err(missing());
    };

    let packets: Option<Vec<PacketDefinition>> =
        serde_yaml::from_value(collection.clone()).map_err(parse_err)?;
    match packets {
        Some(packets) if !packets.is_empty() => Ok(Schema::new(packets)),
        _ => Err(SchemaError::EmptyCollection {
            path: origin.to_path_buf(),
            key: key.to_owned(),
        }),
    }
}
