use savestate_buffer::{slots_for, Layout, SLOT_BITS};
use serde::Serialize;

use crate::cmd::LayoutArgs;
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::manifest::Manifest;
use crate::output::{or_dash, print_json, table, OutputFormat};

#[derive(Debug, Serialize)]
struct FieldRow {
    index: usize,
    source: Option<String>,
    variable: String,
    #[serde(rename = "type")]
    ty: String,
    supported: bool,
    offset: Option<usize>,
    bits: Option<u32>,
}

#[derive(Debug, Serialize)]
struct LayoutOutput {
    fields: Vec<FieldRow>,
    fixed_bits: u64,
    total_bits: Option<u64>,
    byte_count: Option<usize>,
    byte_count_error: Option<String>,
    slots_required: Option<usize>,
    slots_available: usize,
    fits: bool,
}

pub fn run(args: LayoutArgs, format: OutputFormat) -> CliResult<i32> {
    let manifest = Manifest::load(&args.manifest)?;
    let instructions = manifest.instructions()?;
    let layout = Layout::plan(&instructions);

    let (byte_count, byte_count_error) = match layout.resolve_byte_count(manifest.table.byte_count) {
        Ok(count) => (Some(count), None),
        Err(err) => (None, Some(err.to_string())),
    };
    let slots_required = byte_count.map(slots_for);
    let slots_available = manifest.slot_count();
    let fits = slots_required.is_some_and(|needed| needed <= slots_available);

    let fields = layout
        .fields
        .iter()
        .zip(&instructions)
        .map(|(field, ins)| FieldRow {
            index: field.index,
            source: ins.source.as_ref().map(ToString::to_string),
            variable: field.variable.clone(),
            ty: field.field.to_string(),
            supported: field.field.tag().is_some(),
            offset: field.offset,
            bits: field.bits,
        })
        .collect();

    let output = LayoutOutput {
        fields,
        fixed_bits: layout.fixed_bits(),
        total_bits: layout.total_bits(),
        byte_count,
        byte_count_error,
        slots_required,
        slots_available,
        fits,
    };
    print_layout(&output, format);

    Ok(if fits { SUCCESS } else { FAILURE })
}

fn print_layout(output: &LayoutOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut fields = table(&["#", "SOURCE", "VARIABLE", "TYPE", "OFFSET", "BITS"]);
            for f in &output.fields {
                fields.add_row(vec![
                    f.index.to_string(),
                    or_dash(f.source.as_ref()),
                    f.variable.clone(),
                    if f.supported {
                        f.ty.clone()
                    } else {
                        format!("{} (dropped)", f.ty)
                    },
                    or_dash(f.offset),
                    or_dash(f.bits),
                ]);
            }
            println!("{fields}");

            let mut summary = table(&["FIXED BITS", "BYTES", "SLOTS", "AVAILABLE", "FITS"]);
            summary.add_row(vec![
                output.fixed_bits.to_string(),
                or_dash(output.byte_count),
                or_dash(output.slots_required),
                output.slots_available.to_string(),
                output.fits.to_string(),
            ]);
            println!("{summary}");
            if let Some(err) = &output.byte_count_error {
                println!("{err}");
            }
        }
        OutputFormat::Pretty => {
            for f in &output.fields {
                println!(
                    "{:>3} {}.{} {} offset={} bits={}",
                    f.index,
                    or_dash(f.source.as_ref()),
                    f.variable,
                    f.ty,
                    or_dash(f.offset),
                    or_dash(f.bits)
                );
            }
            println!(
                "bytes={} slots={}/{} ({} bits per slot) fits={}",
                or_dash(output.byte_count),
                or_dash(output.slots_required),
                output.slots_available,
                SLOT_BITS,
                output.fits
            );
            if let Some(err) = &output.byte_count_error {
                println!("{err}");
            }
        }
    }
}
