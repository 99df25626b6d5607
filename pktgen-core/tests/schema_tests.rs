//! Schema loading and validation against files on disk.

use assert_fs::prelude::*;
use pktgen_core::{
    schema::{self, DEFAULT_SCHEMA_KEY},
    to_upper_snake, validate, PacketKind, SchemaError, Violation,
};
use predicates::prelude::predicate;
use rstest::rstest;

const SCHEMA: &str = "\
Packet:
  - Type: Unique
    PacketName: Ping
    Desc: keep-alive
  - Type: RequestPacket
    PacketName: TestPacketReq
    Items:
      - Type: int
        Name: order
  - Type: ReplyPacket
    PacketName: TestPacketRes
    Items:
      - Type: int
        Name: order
";

// ---------------------------------------------------------------------------
// 1. Loading
// ---------------------------------------------------------------------------

#[test]
fn load_reads_all_records_in_order() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("PacketDefine.yml");
    file.write_str(SCHEMA).expect("write");

    let schema = schema::load_at(file.path(), DEFAULT_SCHEMA_KEY).expect("load");
    assert_eq!(schema.len(), 3);
    assert_eq!(schema.packets[0].kind, PacketKind::Unique);
    assert_eq!(schema.packets[0].description.as_deref(), Some("keep-alive"));
    assert_eq!(schema.packets[2].name.as_str(), "TestPacketRes");
    assert!(schema.find("TestPacketReq").is_some_and(|p| p.has_fields()));
}

#[test]
fn load_missing_file_returns_io_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = schema::load_at(&dir.path().join("nope.yml"), DEFAULT_SCHEMA_KEY).unwrap_err();
    assert!(matches!(err, SchemaError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("nope.yml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("PacketDefine.yml");
    file.write_str("Packet: [unclosed\n  - : :").expect("write");

    let err = schema::load_at(file.path(), DEFAULT_SCHEMA_KEY).unwrap_err();
    assert!(matches!(err, SchemaError::Parse { .. }), "got: {err}");
    let source_msg = match &err {
        SchemaError::Parse { source, .. } => source.to_string(),
        _ => unreachable!(),
    };
    assert!(!source_msg.is_empty(), "serde_yaml must provide error context");
}

#[test]
fn scaffolded_empty_schema_is_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("PacketDefine.yml");
    file.write_str("Packet:").expect("write");

    let err = schema::load_at(file.path(), DEFAULT_SCHEMA_KEY).unwrap_err();
    assert!(matches!(err, SchemaError::EmptyCollection { .. }), "got: {err}");
    // Loading never writes anything back.
    file.assert(predicate::str::diff("Packet:"));
}

// ---------------------------------------------------------------------------
// 2. Validation over loaded schemas
// ---------------------------------------------------------------------------

#[test]
fn loaded_sample_is_valid() {
    let schema = schema::parse_str(SCHEMA, DEFAULT_SCHEMA_KEY, "x.yml".as_ref()).expect("parse");
    assert!(validate(&schema.packets).is_valid());
}

#[test]
fn invalid_kind_and_duplicates_all_reported() {
    let text = "\
Packet:
  - Type: Request
    PacketName: Foo
  - Type: RequestPacket
    PacketName: Foo
  - Type: ReplyPacket
    PacketName: Bar
    Items:
      - Type: int
        Name: x
      - Type: int
        Name: x
";
    let schema = schema::parse_str(text, DEFAULT_SCHEMA_KEY, "x.yml".as_ref()).expect("parse");
    let report = validate(&schema.packets);
    assert!(!report.is_valid());
    assert_eq!(report.violations.len(), 3, "{report}");
    assert!(matches!(&report.violations[0], Violation::InvalidKind { kind, .. } if kind == "Request"));

    let text = report.diagnostics().join("\n");
    assert!(text.contains("duplicate packet name: Foo"), "{text}");
    assert!(text.contains("Bar : field x is duplicated"), "{text}");
}

// ---------------------------------------------------------------------------
// 3. Identifier normalisation table
// ---------------------------------------------------------------------------

#[rstest]
#[case("HelloWorld", "HELLO_WORLD")]
#[case("PingPacket", "PING_PACKET")]
#[case("TestPacketReq", "TEST_PACKET_REQ")]
#[case("Item3Drop", "ITEM3_DROP")]
#[case("UseSkill2", "USE_SKILL2")]
#[case("IOBuffer", "IO_BUFFER")]
fn normalizes_packet_names(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(to_upper_snake(name), expected);
}
