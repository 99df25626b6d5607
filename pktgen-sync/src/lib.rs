//! # pktgen-sync
//!
//! Region merging, transactional writes and the generation pipeline.
//!
//! Call [`run`] for a full generation pass, [`diff_at`] to preview one, or
//! [`load_checked`] to validate the schema alone.

pub mod diff;
pub mod error;
pub mod pipeline;
pub mod publish;
pub mod region;
pub mod scaffold;
pub mod writer;

pub use diff::{diff_at, FileDiff};
pub use error::SyncError;
pub use pipeline::{load_checked, plan, run, ArtifactOutcome, Plan, PlannedArtifact, RunReport};
pub use region::{Document, NameExtractor, Region, RegionError};
pub use writer::{Transaction, WriteResult};
