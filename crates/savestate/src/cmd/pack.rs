use savestate_buffer::{pack, PackedBuffer};
use serde::Serialize;

use crate::cmd::PackArgs;
use crate::exit::{buffer_error, CliResult, SUCCESS};
use crate::manifest::{read_values, source_from_values, Manifest};
use crate::output::{print_json, table, OutputFormat};

#[derive(Debug, Serialize)]
struct SlotRow {
    index: usize,
    bytes: usize,
    hex: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PackOutput {
    bytes: usize,
    packed_bytes: usize,
    hex: String,
    field_ends: Vec<usize>,
    slots: Vec<SlotRow>,
}

impl PackOutput {
    /// `packed` is the buffer as packed; `padded` what the transfer moves.
    pub(crate) fn new(packed: &PackedBuffer, padded: &PackedBuffer) -> Self {
        Self {
            bytes: padded.len(),
            packed_bytes: packed.len(),
            hex: hex::encode(padded.as_bytes()),
            field_ends: packed.field_ends().to_vec(),
            slots: padded
                .slots()
                .enumerate()
                .map(|(index, chunk)| SlotRow {
                    index,
                    bytes: chunk.len(),
                    hex: hex::encode(chunk),
                })
                .collect(),
        }
    }
}

pub fn run(args: PackArgs, format: OutputFormat) -> CliResult<i32> {
    let manifest = Manifest::load(&args.manifest)?;
    let instructions = manifest.instructions()?;
    let doc = read_values(args.input.values.as_deref(), args.input.values_file.as_deref())?;
    let source = source_from_values(&instructions, &doc)?;

    let packed = pack(&instructions, &source).map_err(|e| buffer_error("pack", e))?;
    let byte_count = manifest
        .table
        .resolved_byte_count()
        .map_err(|e| buffer_error("pack", e))?;
    let padded = packed
        .padded_to(byte_count)
        .map_err(|e| buffer_error("pack", e))?;

    print_pack(&PackOutput::new(&packed, &padded), format);
    Ok(SUCCESS)
}

fn print_pack(output: &PackOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut slots = table(&["SLOT", "BYTES", "HEX"]);
            for slot in &output.slots {
                slots.add_row(vec![
                    slot.index.to_string(),
                    slot.bytes.to_string(),
                    slot.hex.clone(),
                ]);
            }
            println!("{slots}");
            println!(
                "{} bytes packed, {} reserved",
                output.packed_bytes, output.bytes
            );
        }
        OutputFormat::Pretty => {
            for slot in &output.slots {
                println!("slot {}: {}", slot.index, slot.hex);
            }
        }
    }
}
