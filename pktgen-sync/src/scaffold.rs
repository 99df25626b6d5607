//! Scaffolder: materializes missing artifacts and the schema file.

use std::path::PathBuf;

use pktgen_core::GeneratorConfig;
use pktgen_renderer::{ArtifactKind, Renderer};

use crate::error::SyncError;
use crate::writer::replace_file;

/// Create every configured artifact (and the schema) that does not exist yet.
/// Existing files are never touched. Returns the paths created.
pub fn ensure_at(config: &GeneratorConfig, renderer: &Renderer) -> Result<Vec<PathBuf>, SyncError> {
    let mut created = Vec::new();

    let schema = config.schema_path();
    if !schema.exists() {
        replace_file(&schema, renderer.scaffold_schema()?.as_bytes())?;
        tracing::info!("scaffolded: {}", schema.display());
        created.push(schema);
    }

    for (kind, path) in ArtifactKind::configured(config) {
        if path.exists() {
            continue;
        }
        replace_file(&path, renderer.scaffold(kind)?.as_bytes())?;
        tracing::info!("scaffolded {kind}: {}", path.display());
        created.push(path);
    }
    Ok(created)
}
