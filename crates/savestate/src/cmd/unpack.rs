use savestate_buffer::{unpack, MemorySource};
use savestate_codec::AnyPlayer;
use serde::Serialize;

use crate::cmd::UnpackArgs;
use crate::exit::{buffer_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::manifest::{values_to_doc, Manifest, ValueDoc};
use crate::output::{parse_hex, print_json, table, OutputFormat};

#[derive(Debug, Serialize)]
struct UnpackOutput {
    values: ValueDoc,
    applied: usize,
    dropped: usize,
    consumed: usize,
    trailing: usize,
}

pub fn run(args: UnpackArgs, format: OutputFormat) -> CliResult<i32> {
    let manifest = Manifest::load(&args.manifest)?;
    let instructions = manifest.instructions()?;
    let bytes = parse_hex(&args.hex)
        .map_err(|e| CliError::new(DATA_INVALID, format!("--hex: {e}")))?;

    let mut source = MemorySource::new();
    for ins in &instructions {
        if let Some(id) = &ins.source {
            source.add_source(id.clone());
        }
    }
    let report = unpack(&bytes, &instructions, &mut source, &AnyPlayer)
        .map_err(|e| buffer_error("unpack", e))?;

    let output = UnpackOutput {
        values: values_to_doc(&instructions, &source),
        applied: report.applied,
        dropped: report.dropped,
        consumed: report.consumed,
        trailing: bytes.len() - report.consumed,
    };
    print_unpack(&output, format);
    Ok(SUCCESS)
}

fn print_unpack(output: &UnpackOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut values = table(&["SOURCE", "VARIABLE", "VALUE"]);
            for (source, vars) in &output.values {
                for (variable, value) in vars {
                    values.add_row(vec![source.clone(), variable.clone(), value.to_string()]);
                }
            }
            println!("{values}");
            println!(
                "{} fields applied, {} dropped, {} bytes read, {} trailing",
                output.applied, output.dropped, output.consumed, output.trailing
            );
        }
        OutputFormat::Pretty => {
            for (source, vars) in &output.values {
                for (variable, value) in vars {
                    println!("{source}.{variable} = {value}");
                }
            }
        }
    }
}
