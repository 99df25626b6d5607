//! `pktgen list`: print the packets declared in the schema.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use pktgen_core::{schema, PacketDefinition};

/// Arguments for `pktgen list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// One row per field; packets without fields get a single row.
#[derive(Tabled)]
struct PacketRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "PacketName")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "ItemType")]
    item_type: String,
    #[tabled(rename = "ItemName")]
    item_name: String,
}

fn rows(packet: &PacketDefinition) -> Vec<PacketRow> {
    let row = |item_type: &str, item_name: &str| PacketRow {
        kind: packet.kind.to_string(),
        name: packet.name.to_string(),
        description: packet.description.clone().unwrap_or_default(),
        item_type: item_type.to_owned(),
        item_name: item_name.to_owned(),
    };
    match packet.fields.as_deref() {
        Some(fields) if !fields.is_empty() => fields
            .iter()
            .map(|f| row(&f.field_type, &f.name))
            .collect(),
        _ => vec![row("", "")],
    }
}

impl ListArgs {
    pub fn run(self, config: Option<&PathBuf>) -> Result<()> {
        let config = crate::load_config(config)?;
        let path = config.schema_path();
        // Listing does not validate so a broken schema can still be inspected.
        let schema = schema::load_at(&path, &config.schema_key)
            .with_context(|| format!("failed to load schema '{}'", path.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&schema.packets)
                    .context("failed to serialize packet list")?
            );
            return Ok(());
        }

        let table_rows: Vec<PacketRow> = schema.packets.iter().flat_map(rows).collect();
        let mut table = Table::new(table_rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{} packets", schema.len());
        Ok(())
    }
}
