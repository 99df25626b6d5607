//! Scaffold context: serializable payload for the embedded templates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use pktgen_core::GeneratorConfig;

use crate::artifact::RegionSpec;
use crate::error::RenderError;

/// Sentinel lines of the region a template must contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCtx {
    pub begin: String,
    pub end: String,
}

impl From<RegionSpec> for RegionCtx {
    fn from(pair: RegionSpec) -> Self {
        RegionCtx {
            begin: pair.begin_marker(),
            end: pair.end_marker(),
        }
    }
}

/// Values available to every scaffold template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldContext {
    pub session_class: String,
    pub register_namespace: String,
    pub schema_key: String,
    /// File names used in `#include` lines.
    pub packet_id_header: String,
    pub protocol_header: String,
    pub session_header: String,
    /// Set per artifact; absent for the schema template.
    pub region: Option<RegionCtx>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl ScaffoldContext {
    /// Build a [`ScaffoldContext`] from a [`GeneratorConfig`].
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let files = &config.artifacts;
        ScaffoldContext {
            session_class: config.session_class.clone(),
            register_namespace: config.register_namespace.clone(),
            schema_key: config.schema_key.clone(),
            packet_id_header: file_name(&files.packet_id),
            protocol_header: file_name(&files.protocol_header),
            session_header: file_name(&files.session_header),
            region: None,
        }
    }

    pub fn with_region(&self, pair: RegionSpec) -> Self {
        ScaffoldContext {
            region: Some(pair.into()),
            ..self.clone()
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
