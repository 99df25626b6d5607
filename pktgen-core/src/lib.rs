//! pktgen core library: schema model, loading, validation, naming, config.
//!
//! - [`types`]: packet and field definitions
//! - [`schema`]: YAML schema loader
//! - [`validate`]: invariant checks returning a [`ValidationReport`]
//! - [`ident`]: packet name → enumerator identifier
//! - [`config`]: [`GeneratorConfig`]
//! - [`error`]: [`SchemaError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod ident;
pub mod schema;
pub mod types;
pub mod validate;

pub use config::{ArtifactPaths, GeneratorConfig, PublishConfig, RegionNames, CONFIG_FILE_NAME};
pub use error::{ConfigError, SchemaError};
pub use ident::to_upper_snake;
pub use types::{FieldDefinition, PacketDefinition, PacketKind, PacketName, Schema};
pub use validate::{validate, ValidationReport, Violation};
