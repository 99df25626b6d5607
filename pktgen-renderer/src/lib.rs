//! # pktgen-renderer
//!
//! Turns a validated schema into text: Tera scaffolds for files that do not
//! exist yet, and synthesized region interiors for files that do.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pktgen_core::{GeneratorConfig, Schema};
//! use pktgen_renderer::{ArtifactKind, Renderer, Synthesizer};
//!
//! fn preview(config: &GeneratorConfig, schema: &Schema) {
//!     let synth = Synthesizer::new(schema, &config.session_class);
//!     if let Ok(renderer) = Renderer::new(config) {
//!         for kind in ArtifactKind::all() {
//!             if let Ok(skeleton) = renderer.scaffold(*kind) {
//!                 println!("{kind}: {} bytes, {:?}", skeleton.len(), synth.region_content(*kind));
//!             }
//!         }
//!     }
//! }
//! ```

pub mod artifact;
pub mod context;
pub mod engine;
pub mod error;
pub mod synth;

pub use artifact::{ArtifactKind, Discipline, RegionSpec};
pub use context::ScaffoldContext;
pub use engine::{Renderer, TemplateEngine};
pub use error::RenderError;
pub use synth::{reply_name_for, Entry, RegionContent, Synthesizer};
