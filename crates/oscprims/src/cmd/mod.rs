use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod encode;
pub mod slip;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a message, or a message/bundle tree given as JSON.
    Encode(EncodeArgs),
    /// Wrap raw bytes in a single SLIP frame.
    Slip(SlipArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Slip(args) => slip::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Packet framing selectable from the command line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Framing {
    /// Bare OSC packet, as sent in a UDP datagram.
    None,
    /// OSC 1.0 stream framing: int32 size prefix.
    Length,
    /// OSC 1.1 stream framing: double-ended SLIP.
    #[default]
    Slip,
}

impl Framing {
    pub fn label(self) -> &'static str {
        match self {
            Framing::None => "none",
            Framing::Length => "length",
            Framing::Slip => "slip",
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// OSC address pattern, e.g. /oscillator/4/frequency.
    #[arg(required_unless_present_any = ["json", "file"], conflicts_with_all = ["json", "file"])]
    pub address: Option<String>,
    /// Typed arguments: i:<int> f:<float> s:<text> b:<hex>
    /// t:now|immediate|<unix-seconds[.fraction]> T F N I.
    #[arg(value_name = "ARG")]
    pub args: Vec<String>,
    /// Message or bundle tree as inline JSON.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the JSON tree from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Packet framing.
    #[arg(long, value_enum, default_value_t = Framing::Slip)]
    pub framing: Framing,
}

#[derive(Args, Debug)]
pub struct SlipArgs {
    /// Read the payload from a file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Omit the leading END marker.
    #[arg(long)]
    pub single_ended: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
