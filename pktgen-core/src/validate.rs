//! Schema validation.
//!
//! [`validate`] is a pure single pass over the packet list. Every violation is
//! collected; the caller decides whether to abort (the pipeline always does
//! when [`ValidationReport::is_valid`] is false).
//!
//! Rules:
//! - at most one `Unique` packet,
//! - every other packet is `RequestPacket` or `ReplyPacket`,
//! - packet names are unique across the schema,
//! - field names are unique within a packet.

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::types::{PacketDefinition, PacketKind, PacketName};

/// One broken invariant. Positions are zero-based schema indices; `Display`
/// prints them one-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("duplicated Unique type {first} and {second}")]
    DuplicateUnique {
        first: PacketName,
        second: PacketName,
    },

    #[error("invalid packet type: PacketName {packet} / Type: {kind}")]
    InvalidKind { packet: PacketName, kind: String },

    #[error(
        "duplicate packet name: {name} (entries #{} and #{})",
        .first_position + 1,
        .position + 1
    )]
    DuplicatePacketName {
        name: PacketName,
        first_position: usize,
        position: usize,
    },

    #[error("{packet} : field {field} is duplicated")]
    DuplicateFieldName { packet: PacketName, field: String },
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable diagnostics, one per violation, in scan order.
    pub fn diagnostics(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} schema violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// Check every invariant over `packets` without stopping at the first failure.
pub fn validate(packets: &[PacketDefinition]) -> ValidationReport {
    let mut violations = Vec::new();
    let mut unique_seen: Option<&PacketName> = None;
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (position, packet) in packets.iter().enumerate() {
        match &packet.kind {
            PacketKind::Unique => match unique_seen {
                None => unique_seen = Some(&packet.name),
                Some(first) => violations.push(Violation::DuplicateUnique {
                    first: first.clone(),
                    second: packet.name.clone(),
                }),
            },
            PacketKind::Request | PacketKind::Reply => {}
            PacketKind::Unknown(raw) => violations.push(Violation::InvalidKind {
                packet: packet.name.clone(),
                kind: raw.clone(),
            }),
        }

        match positions.get(packet.name.as_str()) {
            Some(&first_position) => violations.push(Violation::DuplicatePacketName {
                name: packet.name.clone(),
                first_position,
                position,
            }),
            None => {
                positions.insert(packet.name.as_str(), position);
            }
        }

        let mut field_names = HashSet::new();
        for field in packet.field_names() {
            if !field_names.insert(field) {
                violations.push(Violation::DuplicateFieldName {
                    packet: packet.name.clone(),
                    field: field.to_owned(),
                });
            }
        }
    }

    ValidationReport { violations }
}
