//! Domain types for the packet schema.
//!
//! Field names follow the YAML record keys (`Type`, `PacketName`, `Desc`,
//! `Items`, `Name`) through serde renames; the Rust side uses snake_case.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed packet name. Doubles as the C++ class name and the source
/// of the enumerator identifier and handler method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PacketName(pub String);

impl PacketName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PacketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PacketName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PacketName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Packet kind as written in the schema's `Type` key.
///
/// Unrecognised strings are kept verbatim in [`PacketKind::Unknown`] so the
/// validator can report them instead of the YAML parser rejecting the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PacketKind {
    Unique,
    Request,
    Reply,
    Unknown(String),
}

impl PacketKind {
    pub fn as_str(&self) -> &str {
        match self {
            PacketKind::Unique => "Unique",
            PacketKind::Request => "RequestPacket",
            PacketKind::Reply => "ReplyPacket",
            PacketKind::Unknown(raw) => raw,
        }
    }

    /// Whether packets of this kind receive a dispatch registration and a
    /// session handler. Everything except `Reply` does, `Unique` included.
    pub fn is_dispatched(&self) -> bool {
        !matches!(self, PacketKind::Reply)
    }
}

impl From<String> for PacketKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Unique" => PacketKind::Unique,
            "RequestPacket" => PacketKind::Request,
            "ReplyPacket" => PacketKind::Reply,
            _ => PacketKind::Unknown(s),
        }
    }
}

impl From<PacketKind> for String {
    fn from(kind: PacketKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A single serialized member of a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Target-language type, emitted verbatim.
    #[serde(rename = "Type")]
    pub field_type: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// One packet record from the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketDefinition {
    #[serde(rename = "Type")]
    pub kind: PacketKind,
    #[serde(rename = "PacketName")]
    pub name: PacketName,
    #[serde(rename = "Desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` when `Items` is absent or null. An explicit empty list is kept as
    /// `Some(vec![])` and still produces serialization methods.
    #[serde(rename = "Items", default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDefinition>>,
}

impl PacketDefinition {
    pub fn has_fields(&self) -> bool {
        self.fields.is_some()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .flat_map(|fields| fields.iter())
            .map(|f| f.name.as_str())
    }
}

/// Ordered packet definitions loaded from one schema document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub packets: Vec<PacketDefinition>,
}

impl Schema {
    pub fn new(packets: Vec<PacketDefinition>) -> Self {
        Self { packets }
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&PacketDefinition> {
        self.packets.iter().find(|p| p.name.0 == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
