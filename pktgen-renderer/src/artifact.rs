//! Managed artifact catalogue: [`ArtifactKind`] and its region layout.
//!
//! | Artifact        | Default file                        | Default region            | Discipline |
//! |-----------------|-------------------------------------|---------------------------|------------|
//! | PacketId        | `PacketIdType.h`                    | `packet id`               | replace    |
//! | ProtocolHeader  | `Protocol.h`                        | `packet class`            | replace    |
//! | ProtocolSource  | `Protocol.cpp`                      | `packet function`         | replace    |
//! | PacketRegister  | `PlayerPacketHandlerRegister.cpp`   | `packet register`         | replace    |
//! | SessionHeader   | `Player.h`                          | `packet handler`          | additive   |
//! | SessionSource   | `PlayerPacketHandler.cpp`           | `packet handler`          | additive   |
//! | SessionRegister | (disabled unless configured, usually `PacketHandlerRegister.cpp`) | `packet handler register` | replace |
//!
//! Region names come from [`RegionNames`] in the config, so trees with
//! existing markers such as `#pragma region Packet Handler` can be adopted.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use pktgen_core::{GeneratorConfig, RegionNames};

/// How a region's interior is maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Interior recomputed from the schema on every run.
    Replace,
    /// Existing interior kept; entries for unrepresented packets appended.
    Additive,
}

/// A named sentinel pair. Each marker must sit alone on its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    pub name: String,
    pub discipline: Discipline,
}

impl RegionSpec {
    pub fn begin_marker(&self) -> String {
        format!("#pragma region {}", self.name)
    }

    pub fn end_marker(&self) -> String {
        format!("#pragma endregion {}", self.name)
    }
}

/// Every source file the generator manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    PacketId,
    ProtocolHeader,
    ProtocolSource,
    PacketRegister,
    SessionHeader,
    SessionSource,
    SessionRegister,
}

impl ArtifactKind {
    /// All artifacts in processing order.
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::PacketId,
            ArtifactKind::ProtocolHeader,
            ArtifactKind::ProtocolSource,
            ArtifactKind::PacketRegister,
            ArtifactKind::SessionHeader,
            ArtifactKind::SessionSource,
            ArtifactKind::SessionRegister,
        ]
    }

    /// Artifacts mirrored to the publish target after a successful commit.
    pub fn published() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::PacketId,
            ArtifactKind::ProtocolHeader,
            ArtifactKind::ProtocolSource,
        ]
    }

    pub fn discipline(&self) -> Discipline {
        match self {
            ArtifactKind::SessionHeader | ArtifactKind::SessionSource => Discipline::Additive,
            _ => Discipline::Replace,
        }
    }

    /// Sentinel pair for this artifact under `names`.
    pub fn region(&self, names: &RegionNames) -> RegionSpec {
        let name = match self {
            ArtifactKind::PacketId => &names.packet_id,
            ArtifactKind::ProtocolHeader => &names.protocol_header,
            ArtifactKind::ProtocolSource => &names.protocol_source,
            ArtifactKind::PacketRegister => &names.packet_register,
            ArtifactKind::SessionHeader => &names.session_header,
            ArtifactKind::SessionSource => &names.session_source,
            ArtifactKind::SessionRegister => &names.session_register,
        };
        RegionSpec {
            name: name.trim().to_owned(),
            discipline: self.discipline(),
        }
    }

    /// Embedded scaffold template for this artifact.
    pub fn template_name(&self) -> &'static str {
        match self {
            ArtifactKind::PacketId => "packet_id.h.tera",
            ArtifactKind::ProtocolHeader => "protocol.h.tera",
            ArtifactKind::ProtocolSource => "protocol.cpp.tera",
            ArtifactKind::PacketRegister => "packet_register.cpp.tera",
            ArtifactKind::SessionHeader => "session.h.tera",
            ArtifactKind::SessionSource => "session_handler.cpp.tera",
            ArtifactKind::SessionRegister => "session_register.cpp.tera",
        }
    }

    /// Resolved output path, or `None` when the artifact is not configured.
    pub fn output_path(&self, config: &GeneratorConfig) -> Option<PathBuf> {
        let files = &config.artifacts;
        let file = match self {
            ArtifactKind::PacketId => &files.packet_id,
            ArtifactKind::ProtocolHeader => &files.protocol_header,
            ArtifactKind::ProtocolSource => &files.protocol_source,
            ArtifactKind::PacketRegister => &files.packet_register,
            ArtifactKind::SessionHeader => &files.session_header,
            ArtifactKind::SessionSource => &files.session_source,
            ArtifactKind::SessionRegister => files.session_register.as_ref()?,
        };
        Some(config.artifact_path(file))
    }

    /// `(kind, path)` for every configured artifact, in processing order.
    pub fn configured(config: &GeneratorConfig) -> Vec<(ArtifactKind, PathBuf)> {
        ArtifactKind::all()
            .iter()
            .filter_map(|kind| kind.output_path(config).map(|path| (*kind, path)))
            .collect()
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::PacketId => "packet-id",
            ArtifactKind::ProtocolHeader => "protocol-header",
            ArtifactKind::ProtocolSource => "protocol-source",
            ArtifactKind::PacketRegister => "packet-register",
            ArtifactKind::SessionHeader => "session-header",
            ArtifactKind::SessionSource => "session-source",
            ArtifactKind::SessionRegister => "session-register",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_carry_region_name() {
        let region = ArtifactKind::ProtocolSource.region(&RegionNames::default());
        assert_eq!(region.begin_marker(), "#pragma region packet function");
        assert_eq!(region.end_marker(), "#pragma endregion packet function");
    }

    #[test]
    fn configured_region_name_is_used() {
        let names = RegionNames {
            session_source: " Packet Handler ".into(),
            ..RegionNames::default()
        };
        let region = ArtifactKind::SessionSource.region(&names);
        assert_eq!(region.begin_marker(), "#pragma region Packet Handler");
        assert_eq!(region.discipline, Discipline::Additive);
        assert_eq!(
            ArtifactKind::SessionHeader.region(&names).begin_marker(),
            "#pragma region packet handler"
        );
    }

    #[test]
    fn only_session_handlers_are_additive() {
        for kind in ArtifactKind::all() {
            let additive = kind.discipline() == Discipline::Additive;
            assert_eq!(
                additive,
                matches!(kind, ArtifactKind::SessionHeader | ArtifactKind::SessionSource),
                "{kind}"
            );
        }
    }

    #[test]
    fn session_register_is_opt_in() {
        let mut config = GeneratorConfig::with_base_dir("/work");
        assert_eq!(ArtifactKind::configured(&config).len(), 6);
        assert!(ArtifactKind::SessionRegister.output_path(&config).is_none());

        config.artifacts.session_register = Some(PathBuf::from("PacketHandlerRegister.cpp"));
        assert_eq!(ArtifactKind::configured(&config).len(), 7);
        assert_eq!(
            ArtifactKind::SessionRegister.output_path(&config),
            Some(PathBuf::from("/work/ContentsServer/PacketHandlerRegister.cpp"))
        );
        assert_eq!(
            ArtifactKind::PacketRegister.output_path(&config),
            Some(PathBuf::from("/work/ContentsServer/PlayerPacketHandlerRegister.cpp"))
        );
    }
}
