use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::exit::{io_error, CliResult};

/// Bytes shown per row in table and pretty dumps.
const ROW_WIDTH: usize = 16;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Encoded bytes plus what produced them.
#[derive(Debug, Serialize)]
pub struct Encoded<'a> {
    /// "message", "bundle" or "slip".
    pub kind: &'a str,
    /// "none", "length" or "slip".
    pub framing: &'a str,
    pub size: usize,
    #[serde(serialize_with = "as_hex")]
    pub bytes: &'a [u8],
}

fn as_hex<S: serde::Serializer>(bytes: &&[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn print_encoded(encoded: &Encoded<'_>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(encoded).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "HEX", "ASCII"]);
            for (row, chunk) in encoded.bytes.chunks(ROW_WIDTH).enumerate() {
                table.add_row(vec![
                    format!("{:04x}", row * ROW_WIDTH),
                    hex_row(chunk),
                    ascii_row(chunk),
                ]);
            }
            println!(
                "{} ({} framing, {} bytes)",
                encoded.kind, encoded.framing, encoded.size
            );
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "kind={} framing={} size={}",
                encoded.kind, encoded.framing, encoded.size
            );
            for (row, chunk) in encoded.bytes.chunks(ROW_WIDTH).enumerate() {
                println!(
                    "{:04x}  {:<47}  {}",
                    row * ROW_WIDTH,
                    hex_row(chunk),
                    ascii_row(chunk)
                );
            }
        }
        OutputFormat::Raw => print_raw(encoded.bytes)?,
    }
    Ok(())
}

pub fn print_raw(data: &[u8]) -> CliResult<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(data)
        .and_then(|()| out.flush())
        .map_err(|err| io_error("failed writing stdout", err))
}

fn hex_row(chunk: &[u8]) -> String {
    chunk
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn ascii_row(chunk: &[u8]) -> String {
    chunk
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                char::from(b)
            } else {
                '.'
            }
        })
        .collect()
}
