//! Dry-run unified diff support for `pktgen diff`.

use std::path::PathBuf;

use similar::TextDiff;

use pktgen_core::GeneratorConfig;
use pktgen_renderer::{ArtifactKind, Renderer};

use crate::pipeline::plan;
use crate::SyncError;

/// A single artifact diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Plan a run and compare each merged artifact to what is on disk.
///
/// No files are written, scaffolds included. A missing artifact diffs
/// against empty text.
pub fn diff_at(config: &GeneratorConfig) -> Result<Vec<FileDiff>, SyncError> {
    let renderer = Renderer::new(config)?;
    let plan = plan(config, &renderer)?;
    let root = config.target_dir();

    let mut diffs = Vec::new();
    for artifact in plan.artifacts {
        let existing = if artifact.existed {
            normalize_line_endings(&artifact.current)
        } else {
            String::new()
        };
        let merged = normalize_line_endings(&artifact.merged);
        if existing == merged {
            continue;
        }

        let relative = artifact.path.strip_prefix(&root).unwrap_or(artifact.path.as_path());
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &merged)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            kind: artifact.kind,
            path: artifact.path,
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
