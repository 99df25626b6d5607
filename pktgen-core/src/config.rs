//! Generator configuration (`pktgen.yaml`).
//!
//! The configuration is an explicit value handed to the pipeline; nothing is
//! read from process-wide state. Relative paths are resolved against
//! [`GeneratorConfig::base_dir`], which [`GeneratorConfig::load_at`] sets to
//! the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::DEFAULT_SCHEMA_KEY;

/// Conventional config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "pktgen.yaml";

/// File names of the managed artifacts, relative to `target_root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub packet_id: PathBuf,
    pub protocol_header: PathBuf,
    pub protocol_source: PathBuf,
    pub packet_register: PathBuf,
    pub session_header: PathBuf,
    pub session_source: PathBuf,
    /// Per-session handler registration. Not managed unless set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_register: Option<PathBuf>,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            packet_id: PathBuf::from("PacketIdType.h"),
            protocol_header: PathBuf::from("Protocol.h"),
            protocol_source: PathBuf::from("Protocol.cpp"),
            packet_register: PathBuf::from("PlayerPacketHandlerRegister.cpp"),
            session_header: PathBuf::from("Player.h"),
            session_source: PathBuf::from("PlayerPacketHandler.cpp"),
            session_register: None,
        }
    }
}

/// Region names per artifact. A region is delimited by
/// `#pragma region <name>` and `#pragma endregion <name>` lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionNames {
    pub packet_id: String,
    pub protocol_header: String,
    pub protocol_source: String,
    pub packet_register: String,
    pub session_header: String,
    pub session_source: String,
    pub session_register: String,
}

impl Default for RegionNames {
    fn default() -> Self {
        Self {
            packet_id: "packet id".to_owned(),
            protocol_header: "packet class".to_owned(),
            protocol_source: "packet function".to_owned(),
            packet_register: "packet register".to_owned(),
            session_header: "packet handler".to_owned(),
            session_source: "packet handler".to_owned(),
            session_register: "packet handler register".to_owned(),
        }
    }
}

/// Mirror destination for the client build.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_root: Option<PathBuf>,
}

/// Everything the pipeline needs to know about paths and naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory relative paths are resolved against. Not serialized.
    #[serde(skip)]
    pub base_dir: PathBuf,
    pub schema: PathBuf,
    pub schema_key: String,
    pub target_root: PathBuf,
    /// Session class that owns the `On<Packet>` handlers.
    pub session_class: String,
    /// Namespace wrapping the dispatch registration `Init()`.
    pub register_namespace: String,
    pub artifacts: ArtifactPaths,
    pub regions: RegionNames,
    pub publish: PublishConfig,
    /// Directory of `.tera` files overriding the embedded scaffold templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            schema: PathBuf::from("PacketDefine.yml"),
            schema_key: DEFAULT_SCHEMA_KEY.to_owned(),
            target_root: PathBuf::from("ContentsServer"),
            session_class: "Player".to_owned(),
            register_namespace: "ContentsPacketRegister".to_owned(),
            artifacts: ArtifactPaths::default(),
            regions: RegionNames::default(),
            publish: PublishConfig::default(),
            templates: None,
        }
    }
}

impl GeneratorConfig {
    /// Defaults rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Load `path`; `base_dir` becomes the file's parent directory.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: GeneratorConfig = if contents.trim().is_empty() {
            GeneratorConfig::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };
        config.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// Load `<dir>/pktgen.yaml` if present, otherwise defaults rooted at `dir`.
    pub fn discover_at(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_at(&path)
        } else {
            Ok(Self::with_base_dir(dir))
        }
    }

    /// Serialize to YAML (used by `pktgen init`).
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn schema_path(&self) -> PathBuf {
        self.resolve(&self.schema)
    }

    pub fn target_dir(&self) -> PathBuf {
        self.resolve(&self.target_root)
    }

    /// Absolute (or base-relative) path of an artifact file.
    pub fn artifact_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.target_dir().join(file)
        }
    }

    pub fn publish_dir(&self) -> Option<PathBuf> {
        self.publish.target_root.as_deref().map(|p| self.resolve(p))
    }

    pub fn template_dir(&self) -> Option<PathBuf> {
        self.templates.as_deref().map(|p| self.resolve(p))
    }
}
