use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod layout;
pub mod pack;
pub mod simulate;
pub mod unpack;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show field offsets, widths and slot usage.
    Layout(LayoutArgs),
    /// Pack values and print the buffer per slot.
    Pack(PackArgs),
    /// Decode a hex buffer and print the values.
    Unpack(UnpackArgs),
    /// Save then load through a simulated transport.
    Simulate(SimulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Layout(args) => layout::run(args, format),
        Command::Pack(args) => pack::run(args, format),
        Command::Unpack(args) => unpack::run(args, format),
        Command::Simulate(args) => simulate::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ValueInput {
    /// Values as JSON: `{"source": {"variable": value}}`.
    #[arg(long, conflicts_with = "values_file")]
    pub values: Option<String>,
    /// Read values from a JSON file.
    #[arg(long, value_name = "PATH", conflicts_with = "values")]
    pub values_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Manifest path.
    pub manifest: PathBuf,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Manifest path.
    pub manifest: PathBuf,
    #[command(flatten)]
    pub input: ValueInput,
}

#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Manifest path.
    pub manifest: PathBuf,
    /// Buffer bytes as hex (whitespace and `0x` prefix allowed).
    #[arg(long)]
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Manifest path.
    pub manifest: PathBuf,
    #[command(flatten)]
    pub input: ValueInput,
    /// Data slot that never becomes ready.
    #[arg(long, value_name = "N")]
    pub stall_slot: Option<usize>,
    /// Polls each slot switch takes to land.
    #[arg(long, default_value = "1")]
    pub ready_delay: u32,
    /// Extra fallback detections after each pass.
    #[arg(long, default_value = "0")]
    pub retriggers: u32,
    /// Simulated time per tick in milliseconds.
    #[arg(long, default_value = "100")]
    pub tick_ms: u64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
