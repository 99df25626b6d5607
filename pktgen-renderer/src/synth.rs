//! Code synthesizer: region interiors generated from a validated [`Schema`].
//!
//! Every generator walks the schema in declaration order. Replace regions get
//! one complete `String`; additive regions get a list of [`Entry`] values keyed
//! by packet name so the merge engine can skip the ones already present.
//!
//! Emitted C++ relies on the runtime providing `IPacket`, `PacketId`,
//! `NetBuffer`, `SetBufferToParameters`, `SetParametersToBuffer`,
//! `PacketHandlerUtil::RegisterPacket` and `RegisterPacketHandler`.

use std::collections::HashSet;
use std::fmt::Write as _;

use pktgen_core::{to_upper_snake, PacketDefinition, PacketKind, Schema};

use crate::artifact::ArtifactKind;

/// Name of the generated identifier enumeration.
pub const PACKET_ID_ENUM: &str = "PACKET_ID";

/// Enumerator reserved for "no packet".
pub const INVALID_PACKET_ID: &str = "INVALID_PACKET_ID";

/// One additive-region entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Packet name the entry represents; matched against names extracted from
    /// the existing region.
    pub key: String,
    pub text: String,
}

/// Synthesized interior for one artifact's region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionContent {
    Replace(String),
    Additive(Vec<Entry>),
}

/// Reply packet conventionally answering `request`.
///
/// Only three rules exist: `…Request` → `…Response`, `…Req` → `…Res`, and
/// `Ping` → `Pong`.
pub fn reply_name_for(request: &str) -> Option<String> {
    if request == "Ping" {
        return Some("Pong".to_owned());
    }
    if let Some(stem) = request.strip_suffix("Request") {
        return Some(format!("{stem}Response"));
    }
    request.strip_suffix("Req").map(|stem| format!("{stem}Res"))
}

/// Generators over one schema for one session class.
pub struct Synthesizer<'a> {
    schema: &'a Schema,
    session_class: &'a str,
}

impl<'a> Synthesizer<'a> {
    pub fn new(schema: &'a Schema, session_class: &'a str) -> Self {
        Self {
            schema,
            session_class,
        }
    }

    /// Region content for `kind`.
    pub fn region_content(&self, kind: ArtifactKind) -> RegionContent {
        match kind {
            ArtifactKind::PacketId => RegionContent::Replace(self.enum_body()),
            ArtifactKind::ProtocolHeader => RegionContent::Replace(self.class_declarations()),
            ArtifactKind::ProtocolSource => RegionContent::Replace(self.method_bodies()),
            ArtifactKind::PacketRegister => RegionContent::Replace(self.registrations()),
            ArtifactKind::SessionHeader => RegionContent::Additive(self.handler_declarations()),
            ArtifactKind::SessionSource => RegionContent::Additive(self.handler_stubs()),
            ArtifactKind::SessionRegister => {
                RegionContent::Replace(self.handler_registrations())
            }
        }
    }

    fn dispatched(&self) -> impl Iterator<Item = &'a PacketDefinition> {
        let schema: &'a Schema = self.schema;
        schema.packets.iter().filter(|p| p.kind.is_dispatched())
    }

    /// `INVALID_PACKET_ID = 0` followed by one enumerator per packet.
    pub fn enum_body(&self) -> String {
        let mut out = format!("\t{INVALID_PACKET_ID} = 0\n");
        for packet in &self.schema.packets {
            let _ = writeln!(out, "\t, {}", to_upper_snake(packet.name.as_str()));
        }
        out
    }

    /// One class per packet. Serialization methods and members only when the
    /// packet declares `Items`.
    pub fn class_declarations(&self) -> String {
        let mut out = String::new();
        for packet in &self.schema.packets {
            let name = packet.name.as_str();
            let _ = write!(
                out,
                "class {name} : public IPacket\n\
                 {{\n\
                 public:\n\
                 \t{name}() = default;\n\
                 \tvirtual ~{name}() override = default;\n\
                 \n\
                 public:\n\
                 \tvirtual PacketId GetPacketId() const override;\n"
            );
            if let Some(fields) = &packet.fields {
                out.push_str("\tvirtual void BufferToPacket(NetBuffer& buffer) override;\n");
                out.push_str("\tvirtual void PacketToBuffer(NetBuffer& buffer) override;\n");
                out.push_str("\npublic:\n");
                for field in fields {
                    let _ = writeln!(out, "\t{} {};", field.field_type, field.name);
                }
            }
            out.push_str("};\n\n");
        }
        out
    }

    /// Method definitions. A signature already emitted in this pass is not
    /// emitted again.
    pub fn method_bodies(&self) -> String {
        let mut out = String::new();
        let mut emitted: HashSet<String> = HashSet::new();

        for packet in &self.schema.packets {
            let name = packet.name.as_str();
            let id = to_upper_snake(name);

            let signature = format!("PacketId {name}::GetPacketId() const");
            if emitted.insert(signature.clone()) {
                let _ = write!(
                    out,
                    "{signature}\n{{\n\treturn static_cast<PacketId>({PACKET_ID_ENUM}::{id});\n}}\n"
                );
            }

            if !packet.has_fields() {
                continue;
            }
            let arguments = std::iter::once("buffer")
                .chain(packet.field_names())
                .collect::<Vec<_>>()
                .join(", ");

            for (method, helper) in [
                ("BufferToPacket", "SetBufferToParameters"),
                ("PacketToBuffer", "SetParametersToBuffer"),
            ] {
                let signature = format!("void {name}::{method}(NetBuffer& buffer)");
                if emitted.insert(signature.clone()) {
                    let _ = write!(out, "{signature}\n{{\n\t{helper}({arguments});\n}}\n");
                }
            }
        }
        out
    }

    /// One `RegisterPacket` call per dispatched packet.
    pub fn registrations(&self) -> String {
        let mut out = String::new();
        for packet in self.dispatched() {
            let _ = writeln!(
                out,
                "\t\tPacketHandlerUtil::RegisterPacket<{}>();",
                packet.name
            );
        }
        out
    }

    /// `void On<Packet>(const <Packet>& packet);` per dispatched packet.
    pub fn handler_declarations(&self) -> Vec<Entry> {
        self.dispatched()
            .map(|packet| Entry {
                key: packet.name.0.clone(),
                text: format!("\tvoid On{0}(const {0}& packet);\n", packet.name),
            })
            .collect()
    }

    /// Handler definitions. When the conventional reply packet exists the stub
    /// sends an empty one.
    pub fn handler_stubs(&self) -> Vec<Entry> {
        let session = self.session_class;
        self.dispatched()
            .map(|packet| {
                let name = packet.name.as_str();
                let body = match self.reply_for(name) {
                    Some(reply) => format!("\t{reply} reply;\n\tSendPacket(reply);\n"),
                    None => String::new(),
                };
                Entry {
                    key: name.to_owned(),
                    text: format!(
                        "void {session}::On{name}(const {name}& packet)\n{{\n{body}}}\n\n"
                    ),
                }
            })
            .collect()
    }

    /// `RegisterPacketHandler` calls binding each dispatched packet to its
    /// session handler.
    pub fn handler_registrations(&self) -> String {
        let session = self.session_class;
        let mut out = String::new();
        for packet in self.dispatched() {
            let name = packet.name.as_str();
            let id = to_upper_snake(name);
            let _ = writeln!(
                out,
                "\tRegisterPacketHandler<{session}, {name}>(static_cast<PacketId>({PACKET_ID_ENUM}::{id}), &{session}::On{name});"
            );
        }
        out
    }

    fn reply_for(&self, request: &str) -> Option<String> {
        let candidate = reply_name_for(request)?;
        self.schema
            .find(&candidate)
            .filter(|p| p.kind == PacketKind::Reply)
            .map(|p| p.name.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pktgen_core::{FieldDefinition, PacketName};

    fn packet(kind: PacketKind, name: &str, fields: Option<Vec<(&str, &str)>>) -> PacketDefinition {
        PacketDefinition {
            kind,
            name: PacketName::from(name),
            description: None,
            fields: fields.map(|fs| {
                fs.into_iter()
                    .map(|(t, n)| FieldDefinition {
                        field_type: t.to_owned(),
                        name: n.to_owned(),
                    })
                    .collect()
            }),
        }
    }

    fn sample() -> Schema {
        Schema::new(vec![
            packet(PacketKind::Unique, "Ping", None),
            packet(PacketKind::Reply, "Pong", None),
            packet(
                PacketKind::Request,
                "TestPacketReq",
                Some(vec![("int", "order"), ("std::string", "note")]),
            ),
            packet(PacketKind::Reply, "TestPacketRes", Some(vec![("int", "order")])),
        ])
    }

    #[test]
    fn enum_body_lists_every_packet_in_order() {
        let schema = sample();
        let body = Synthesizer::new(&schema, "Player").enum_body();
        assert_eq!(
            body,
            "\tINVALID_PACKET_ID = 0\n\t, PING\n\t, PONG\n\t, TEST_PACKET_REQ\n\t, TEST_PACKET_RES\n"
        );
    }

    #[test]
    fn class_without_items_has_only_id_accessor() {
        let schema = Schema::new(vec![packet(PacketKind::Request, "Ping", None)]);
        let block = Synthesizer::new(&schema, "Player").class_declarations();
        assert_eq!(
            block,
            "class Ping : public IPacket\n{\npublic:\n\tPing() = default;\n\tvirtual ~Ping() override = default;\n\npublic:\n\tvirtual PacketId GetPacketId() const override;\n};\n\n"
        );
    }

    #[test]
    fn class_with_items_declares_serializers_and_members() {
        let schema = sample();
        let block = Synthesizer::new(&schema, "Player").class_declarations();
        assert!(block.contains(
            "\tvirtual PacketId GetPacketId() const override;\n\
             \tvirtual void BufferToPacket(NetBuffer& buffer) override;\n\
             \tvirtual void PacketToBuffer(NetBuffer& buffer) override;\n\
             \n\
             public:\n\
             \tint order;\n\
             \tstd::string note;\n\
             };\n"
        ));
        assert_eq!(block.matches("class ").count(), 4);
    }

    #[test]
    fn method_bodies_pass_fields_positionally() {
        let schema = sample();
        let bodies = Synthesizer::new(&schema, "Player").method_bodies();
        assert!(bodies.contains(
            "PacketId TestPacketReq::GetPacketId() const\n{\n\treturn static_cast<PacketId>(PACKET_ID::TEST_PACKET_REQ);\n}\n"
        ));
        assert!(bodies.contains(
            "void TestPacketReq::BufferToPacket(NetBuffer& buffer)\n{\n\tSetBufferToParameters(buffer, order, note);\n}\n"
        ));
        assert!(bodies.contains(
            "void TestPacketReq::PacketToBuffer(NetBuffer& buffer)\n{\n\tSetParametersToBuffer(buffer, order, note);\n}\n"
        ));
        assert!(!bodies.contains("Ping::BufferToPacket"));
        assert_eq!(bodies.matches("::GetPacketId() const").count(), 4);
    }

    #[test]
    fn repeated_signature_is_emitted_once() {
        // Only reachable with an unvalidated schema.
        let schema = Schema::new(vec![
            packet(PacketKind::Request, "Dup", Some(vec![("int", "a")])),
            packet(PacketKind::Request, "Dup", Some(vec![("int", "b")])),
        ]);
        let bodies = Synthesizer::new(&schema, "Player").method_bodies();
        assert_eq!(bodies.matches("PacketId Dup::GetPacketId() const").count(), 1);
        assert_eq!(bodies.matches("void Dup::BufferToPacket").count(), 1);
        assert!(bodies.contains("SetBufferToParameters(buffer, a);"));
    }

    #[test]
    fn registrations_skip_reply_but_keep_unique() {
        let schema = sample();
        let calls = Synthesizer::new(&schema, "Player").registrations();
        assert_eq!(
            calls,
            "\t\tPacketHandlerUtil::RegisterPacket<Ping>();\n\t\tPacketHandlerUtil::RegisterPacket<TestPacketReq>();\n"
        );
    }

    #[test]
    fn handler_entries_are_keyed_by_packet() {
        let schema = sample();
        let synth = Synthesizer::new(&schema, "Player");
        let decls = synth.handler_declarations();
        assert_eq!(
            decls.iter().map(|e| e.key.as_str()).collect::<Vec<_>>(),
            vec!["Ping", "TestPacketReq"]
        );
        assert_eq!(decls[0].text, "\tvoid OnPing(const Ping& packet);\n");
    }

    #[test]
    fn stubs_answer_with_conventional_reply() {
        let schema = sample();
        let stubs = Synthesizer::new(&schema, "Player").handler_stubs();
        assert_eq!(
            stubs[0].text,
            "void Player::OnPing(const Ping& packet)\n{\n\tPong reply;\n\tSendPacket(reply);\n}\n\n"
        );
        assert!(stubs[1].text.contains("\tTestPacketRes reply;\n"));
    }

    #[test]
    fn stub_is_empty_without_matching_reply() {
        let schema = Schema::new(vec![
            packet(PacketKind::Request, "MoveReq", None),
            packet(PacketKind::Request, "MoveRes", None),
        ]);
        let stubs = Synthesizer::new(&schema, "Avatar").handler_stubs();
        assert_eq!(stubs[0].text, "void Avatar::OnMoveReq(const MoveReq& packet)\n{\n}\n\n");
    }

    #[test]
    fn handler_registrations_bind_session_methods() {
        let schema = sample();
        let calls = Synthesizer::new(&schema, "Player").handler_registrations();
        assert!(calls.starts_with(
            "\tRegisterPacketHandler<Player, Ping>(static_cast<PacketId>(PACKET_ID::PING), &Player::OnPing);\n"
        ));
        assert_eq!(calls.lines().count(), 2);
    }

    #[test]
    fn reply_names_follow_the_three_rules_only() {
        assert_eq!(reply_name_for("Ping").as_deref(), Some("Pong"));
        assert_eq!(reply_name_for("LoginRequest").as_deref(), Some("LoginResponse"));
        assert_eq!(reply_name_for("TestPacketReq").as_deref(), Some("TestPacketRes"));
        assert_eq!(reply_name_for("Pong"), None);
        assert_eq!(reply_name_for("PingPacket"), None);
        assert_eq!(reply_name_for("Query"), None);
    }
}
