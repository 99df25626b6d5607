//! Publisher: mirrors the shared protocol artifacts to the client tree.

use std::path::Path;

use pktgen_core::GeneratorConfig;
use pktgen_renderer::ArtifactKind;

use crate::error::{io_err, SyncError};
use crate::writer::{digest, file_digest, replace_file, WriteResult};

/// Copy the identifier enumeration and protocol header/source into `dest_dir`
/// under their own file names. A destination already holding identical bytes
/// is left alone.
pub fn publish_at(config: &GeneratorConfig, dest_dir: &Path) -> Result<Vec<WriteResult>, SyncError> {
    let mut results = Vec::new();
    for kind in ArtifactKind::published() {
        let Some(source) = kind.output_path(config) else {
            continue;
        };
        let Some(name) = source.file_name() else {
            continue;
        };
        let dest = dest_dir.join(name);

        let bytes = std::fs::read(&source).map_err(|e| io_err(&source, e))?;
        let current = file_digest(&dest).map_err(|e| io_err(&dest, e))?;
        if current.as_deref() == Some(digest(&bytes).as_str()) {
            tracing::debug!("publish unchanged: {}", dest.display());
            results.push(WriteResult::Unchanged { path: dest });
            continue;
        }

        replace_file(&dest, &bytes)?;
        tracing::info!("published {kind}: {}", dest.display());
        results.push(WriteResult::Written { path: dest });
    }
    Ok(results)
}
