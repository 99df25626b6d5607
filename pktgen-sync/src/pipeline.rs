//! Generation pipeline: scaffold → load → validate → synthesize → merge →
//! stage → commit → publish.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use pktgen_core::{schema, validate, GeneratorConfig, Schema};
use pktgen_renderer::{ArtifactKind, RegionContent, RegionSpec, Renderer, Synthesizer};

use crate::error::{io_err, SyncError};
use crate::publish::publish_at;
use crate::region::{Document, NameExtractor};
use crate::scaffold;
use crate::writer::{Transaction, WriteResult};

/// Merged content for one artifact, not yet written.
#[derive(Debug, Clone)]
pub struct PlannedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Whether the file was on disk. Missing files are planned from their
    /// scaffold template.
    pub existed: bool,
    pub current: String,
    pub merged: String,
    /// Entries added to an additive region; always 0 for replace regions.
    pub inserted: usize,
}

impl PlannedArtifact {
    pub fn changes(&self) -> bool {
        !self.existed || self.current != self.merged
    }
}

/// Every configured artifact merged against one validated schema.
#[derive(Debug, Clone)]
pub struct Plan {
    pub schema: Schema,
    pub artifacts: Vec<PlannedArtifact>,
}

/// Per-artifact result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    #[serde(flatten)]
    pub result: WriteResult,
    pub inserted: usize,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub packets: usize,
    pub scaffolded: Vec<PathBuf>,
    pub artifacts: Vec<ArtifactOutcome>,
    pub published: Vec<WriteResult>,
}

/// Load the schema and reject it unless every invariant holds.
pub fn load_checked(config: &GeneratorConfig) -> Result<Schema, SyncError> {
    let schema = schema::load_at(&config.schema_path(), &config.schema_key)?;
    let report = validate(&schema.packets);
    if !report.is_valid() {
        return Err(SyncError::Validation(report));
    }
    tracing::debug!("schema ok: {} packet(s)", schema.len());
    Ok(schema)
}

/// Current text of an artifact, or `None` when it does not exist yet.
fn read_artifact(path: &Path) -> Result<Option<String>, SyncError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(path, e)),
    };
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| SyncError::NotUtf8 {
            path: path.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        })
}

fn merge_artifact(
    kind: ArtifactKind,
    region: &RegionSpec,
    path: &Path,
    current: &str,
    content: RegionContent,
    session_class: &str,
) -> Result<(String, usize), SyncError> {
    let structural = |source| SyncError::Structural {
        path: path.to_path_buf(),
        source,
    };
    let mut doc = Document::parse(current);

    let inserted = match content {
        RegionContent::Replace(text) => {
            doc.replace(region, &text).map_err(structural)?;
            0
        }
        RegionContent::Additive(entries) => {
            let extractor = match kind {
                ArtifactKind::SessionHeader => NameExtractor::declarations()?,
                _ => NameExtractor::definitions(session_class)?,
            };
            doc.merge_additive(region, &entries, &extractor)
                .map_err(structural)?
        }
    };
    Ok((doc.render(), inserted))
}

/// Merge every configured artifact in memory. Nothing is written; a
/// structural problem in any artifact fails the whole plan.
pub fn plan(config: &GeneratorConfig, renderer: &Renderer) -> Result<Plan, SyncError> {
    let schema = load_checked(config)?;
    let synth = Synthesizer::new(&schema, &config.session_class);

    let mut artifacts = Vec::new();
    for (kind, path) in ArtifactKind::configured(config) {
        let (existed, current) = match read_artifact(&path)? {
            Some(text) => (true, text),
            None => (false, renderer.scaffold(kind)?),
        };
        let (merged, inserted) = merge_artifact(
            kind,
            &kind.region(&config.regions),
            &path,
            &current,
            synth.region_content(kind),
            &config.session_class,
        )?;
        if inserted > 0 {
            tracing::info!("{kind}: {inserted} handler entries added");
        }
        artifacts.push(PlannedArtifact {
            kind,
            path,
            existed,
            current,
            merged,
            inserted,
        });
    }

    Ok(Plan { schema, artifacts })
}

/// Run one full generation pass against `config`.
///
/// Dry runs create no files at all: missing artifacts are planned from their
/// templates and nothing is published.
pub fn run(config: &GeneratorConfig, dry_run: bool) -> Result<RunReport, SyncError> {
    let generated_at = Utc::now();
    let renderer = Renderer::new(config)?;

    let scaffolded = if dry_run {
        Vec::new()
    } else {
        scaffold::ensure_at(config, &renderer)?
    };

    let plan = plan(config, &renderer)?;

    let mut tx = Transaction::new(dry_run);
    for artifact in &plan.artifacts {
        tx.stage(&artifact.path, &artifact.merged)?;
    }
    let results = tx.commit()?;

    let artifacts = plan
        .artifacts
        .iter()
        .zip(results)
        .map(|(artifact, result)| ArtifactOutcome {
            kind: artifact.kind,
            result,
            inserted: artifact.inserted,
        })
        .collect();

    let published = match config.publish_dir() {
        Some(dir) if !dry_run => publish_at(config, &dir)?,
        _ => Vec::new(),
    };

    Ok(RunReport {
        generated_at,
        dry_run,
        packets: plan.schema.len(),
        scaffolded,
        artifacts,
        published,
    })
}
