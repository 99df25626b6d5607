//! Tera scaffold engine: [`TemplateEngine`] and [`Renderer`].
//!
//! Each managed artifact has one embedded template that already contains the
//! sentinel pair its region needs, so a freshly scaffolded file can go
//! straight through the merge engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use pktgen_core::{GeneratorConfig, RegionNames};

use crate::artifact::ArtifactKind;
use crate::context::ScaffoldContext;
use crate::error::RenderError;

/// Template that seeds an absent schema file.
pub const SCHEMA_TEMPLATE: &str = "schema.yml.tera";

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("packet_id.h.tera", include_str!("templates/packet_id.h.tera")),
    ("protocol.h.tera", include_str!("templates/protocol.h.tera")),
    ("protocol.cpp.tera", include_str!("templates/protocol.cpp.tera")),
    (
        "packet_register.cpp.tera",
        include_str!("templates/packet_register.cpp.tera"),
    ),
    ("session.h.tera", include_str!("templates/session.h.tera")),
    (
        "session_handler.cpp.tera",
        include_str!("templates/session_handler.cpp.tera"),
    ),
    (
        "session_register.cpp.tera",
        include_str!("templates/session_register.cpp.tera"),
    ),
    (SCHEMA_TEMPLATE, include_str!("templates/schema.yml.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert((*name).to_string(), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for scaffold templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files named like the embedded ones
/// (`protocol.h.tera`, ...); they replace the defaults.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render a single named template.
    pub fn render(&self, name: &str, ctx: &ScaffoldContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(name, &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Scaffold renderer bound to one [`GeneratorConfig`]. Create once per run.
pub struct Renderer {
    engine: TemplateEngine,
    ctx: ScaffoldContext,
    regions: RegionNames,
}

impl Renderer {
    /// Embedded templates plus any overrides from `config.templates`.
    pub fn new(config: &GeneratorConfig) -> Result<Self, RenderError> {
        let overrides = config.template_dir();
        Ok(Renderer {
            engine: TemplateEngine::new(overrides.as_deref())?,
            ctx: ScaffoldContext::from_config(config),
            regions: config.regions.clone(),
        })
    }

    /// Initial content for an absent artifact.
    pub fn scaffold(&self, kind: ArtifactKind) -> Result<String, RenderError> {
        let ctx = self.ctx.with_region(kind.region(&self.regions));
        self.engine.render(kind.template_name(), &ctx)
    }

    /// Initial content for an absent schema file.
    pub fn scaffold_schema(&self) -> Result<String, RenderError> {
        self.engine.render(SCHEMA_TEMPLATE, &self.ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn renderer() -> Renderer {
        Renderer::new(&GeneratorConfig::with_base_dir("/work")).expect("renderer")
    }

    #[test]
    fn every_artifact_scaffold_contains_its_sentinels() {
        let renderer = renderer();
        for kind in ArtifactKind::all() {
            let content = renderer
                .scaffold(*kind)
                .unwrap_or_else(|e| panic!("scaffold failed for {kind}: {e}"));
            let region = kind.region(&RegionNames::default());
            let lines: Vec<&str> = content.lines().collect();
            let begin = lines.iter().position(|l| *l == region.begin_marker());
            let end = lines.iter().position(|l| *l == region.end_marker());
            assert!(
                matches!((begin, end), (Some(b), Some(e)) if b < e),
                "{kind} scaffold lacks an ordered sentinel pair:\n{content}"
            );
        }
    }

    #[test]
    fn scaffold_uses_configured_region_name() {
        let mut config = GeneratorConfig::with_base_dir("/work");
        config.regions.session_source = "Packet Handler".into();
        let renderer = Renderer::new(&config).unwrap();

        let source = renderer.scaffold(ArtifactKind::SessionSource).unwrap();
        assert!(source.contains("\n#pragma region Packet Handler\n"));
        assert!(source.contains("\n#pragma endregion Packet Handler\n"));
    }

    #[test]
    fn session_templates_use_configured_class() {
        let mut config = GeneratorConfig::with_base_dir("/work");
        config.session_class = "Avatar".into();
        config.artifacts.session_header = PathBuf::from("Avatar.h");
        let renderer = Renderer::new(&config).unwrap();

        let header = renderer.scaffold(ArtifactKind::SessionHeader).unwrap();
        assert!(header.contains("class Avatar final : public RUDPSession"));
        let source = renderer.scaffold(ArtifactKind::SessionSource).unwrap();
        assert!(source.contains("#include \"Avatar.h\""));
    }

    #[test]
    fn packet_id_scaffold_has_invalid_sentinel_entry() {
        let content = renderer().scaffold(ArtifactKind::PacketId).unwrap();
        assert!(content.contains("enum class PACKET_ID : unsigned int"));
        assert!(content.contains("\tINVALID_PACKET_ID = 0\n"));
    }

    #[test]
    fn schema_scaffold_is_bare_key() {
        let content = renderer().scaffold_schema().unwrap();
        assert_eq!(content.trim_end(), "Packet:");
    }

    #[test]
    fn no_crlf_in_any_scaffold() {
        let renderer = renderer();
        for kind in ArtifactKind::all() {
            let content = renderer.scaffold(*kind).unwrap();
            assert!(!content.contains('\r'), "{kind} scaffold contains CR");
        }
    }

    #[test]
    fn user_template_overrides_embedded_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("protocol.cpp.tera"),
            "// custom\n{{ region.begin }}\n{{ region.end }}\n",
        )
        .unwrap();
        let mut config = GeneratorConfig::with_base_dir("/work");
        config.templates = Some(dir.path().to_path_buf());

        let renderer = Renderer::new(&config).unwrap();
        let content = renderer.scaffold(ArtifactKind::ProtocolSource).unwrap();
        assert!(content.starts_with("// custom\n#pragma region packet function\n"));
    }
}
