use std::time::Duration;

use savestate_buffer::{pack, value_to_json, Instruction, MemorySource, SourceProvider};
use savestate_codec::{FieldType, Value};
use savestate_sequencer::{ChunkSequencer, Failure, Request, SequencerEvent};
use savestate_transport::{SimulatedTransport, SimulatedTransportConfig};
use serde::Serialize;
use tracing::info;

use crate::cmd::pack::PackOutput;
use crate::cmd::SimulateArgs;
use crate::exit::{
    buffer_error, sequencer_error, CliError, CliResult, FAILURE, INTERNAL, SUCCESS, TIMEOUT,
};
use crate::manifest::{read_values, source_from_values, Manifest};
use crate::output::{print_json, table, OutputFormat};

const MAX_TICKS: u64 = 10_000_000;

type Sim = ChunkSequencer<SimulatedTransport, MemorySource, Vec<SequencerEvent>>;

#[derive(Debug, Serialize)]
struct EventRow {
    tick: u64,
    event: &'static str,
    detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct Mismatch {
    source: String,
    variable: String,
    saved: serde_json::Value,
    loaded: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct SimulateOutput {
    buffer: PackOutput,
    events: Vec<EventRow>,
    ticks: u64,
    simulated_ms: u128,
    data_activations: usize,
    bit_writes: usize,
    round_trip: bool,
    mismatches: Vec<Mismatch>,
}

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    let manifest = Manifest::load(&args.manifest)?;
    let instructions = manifest.instructions()?;
    let doc = read_values(args.input.values.as_deref(), args.input.values_file.as_deref())?;
    let source = source_from_values(&instructions, &doc)?;
    let saved = source.clone();

    let transport = SimulatedTransport::new(SimulatedTransportConfig {
        ready_delay_polls: args.ready_delay,
        stalled_slots: args.stall_slot.into_iter().collect(),
        stall_fallback: false,
        fallback_retriggers: args.retriggers,
    });
    let mut seq = ChunkSequencer::new(
        manifest.sequencer_config(),
        instructions.clone(),
        transport,
        source,
        Vec::new(),
    )
    .map_err(|e| sequencer_error("simulate", e))?;

    let packed = pack(&instructions, &saved).map_err(|e| buffer_error("simulate", e))?;
    let padded = packed
        .padded_to(seq.byte_count())
        .map_err(|e| buffer_error("simulate", e))?;

    let tick = Duration::from_millis(args.tick_ms.max(1));
    let mut events = Vec::new();
    let mut ticks = 0;

    let seen = seq.events().len();
    seq.save().map_err(|e| sequencer_error("save", e))?;
    ticks += run_until_idle(&mut seq, tick, ticks, seen, &mut events)?;

    let saved_ok = !seq.events().iter().any(SequencerEvent::is_failure);
    if saved_ok {
        // Start the load from blank values so every restored field is visible.
        let mut blank = MemorySource::new();
        for ins in &instructions {
            if let Some(id) = &ins.source {
                blank.add_source(id.clone());
            }
        }
        *seq.source_mut() = blank;

        let seen = seq.events().len();
        if seq.load() == Request::Rejected {
            return Err(CliError::new(INTERNAL, "load rejected after save finished"));
        }
        ticks += run_until_idle(&mut seq, tick, ticks, seen, &mut events)?;
    }

    let failure = seq.events().iter().find_map(|event| match event {
        SequencerEvent::SaveFailed(f) | SequencerEvent::LoadFailed(f) => Some(f.clone()),
        _ => None,
    });
    let mismatches = if failure.is_none() {
        compare(&instructions, &saved, seq.source())
    } else {
        Vec::new()
    };
    let round_trip = failure.is_none() && mismatches.is_empty();
    info!(ticks, round_trip, "simulation finished");

    let output = SimulateOutput {
        buffer: PackOutput::new(&packed, &padded),
        events,
        ticks,
        simulated_ms: tick.as_millis() * u128::from(ticks),
        data_activations: seq.transport().data_activations(),
        bit_writes: seq.transport().bit_writes(),
        round_trip,
        mismatches,
    };
    print_simulation(&output, format);

    Ok(match failure {
        Some(Failure::Timeout(_)) => TIMEOUT,
        Some(Failure::Decode(_)) => FAILURE,
        None if round_trip => SUCCESS,
        None => FAILURE,
    })
}

/// Tick until the sequencer is idle, recording each event past `seen` with
/// the tick it arrived on. Events raised by the request itself carry the
/// tick before the first one run here.
fn run_until_idle(
    seq: &mut Sim,
    tick: Duration,
    offset: u64,
    mut seen: usize,
    rows: &mut Vec<EventRow>,
) -> CliResult<u64> {
    record(seq, offset, &mut seen, rows);
    for n in 1..=MAX_TICKS {
        seq.tick(tick);
        record(seq, offset + n, &mut seen, rows);
        if seq.status().is_idle() {
            return Ok(n);
        }
    }
    Err(CliError::new(
        INTERNAL,
        format!("sequencer still busy after {MAX_TICKS} ticks"),
    ))
}

fn record(seq: &Sim, tick: u64, seen: &mut usize, rows: &mut Vec<EventRow>) {
    for event in &seq.events()[*seen..] {
        rows.push(EventRow {
            tick,
            event: event.name(),
            detail: detail(event),
        });
    }
    *seen = seq.events().len();
}

fn detail(event: &SequencerEvent) -> Option<String> {
    match event {
        SequencerEvent::SaveFailed(failure) | SequencerEvent::LoadFailed(failure) => {
            Some(failure.to_string())
        }
        SequencerEvent::Loaded(report) => Some(format!(
            "{} applied, {} ignored, {} dropped",
            report.applied, report.ignored, report.dropped
        )),
        _ => None,
    }
}

/// Fields whose loaded value differs from what was saved (defaults for
/// values that were absent).
fn compare(
    instructions: &[Instruction],
    saved: &MemorySource,
    loaded: &MemorySource,
) -> Vec<Mismatch> {
    let mut out = Vec::new();
    for ins in instructions {
        let (Some(source), FieldType::Supported(tag)) = (&ins.source, &ins.field) else {
            continue;
        };
        let expected = saved
            .get(source, &ins.variable)
            .unwrap_or_else(|| Value::default_for(*tag));
        let expected = value_to_json(&expected);
        let actual = loaded
            .get(source, &ins.variable)
            .map(|v| value_to_json(&v));
        if actual.as_ref() != Some(&expected) {
            out.push(Mismatch {
                source: source.to_string(),
                variable: ins.variable.clone(),
                saved: expected,
                loaded: actual,
            });
        }
    }
    out
}

fn print_simulation(output: &SimulateOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut events = table(&["TICK", "EVENT", "DETAIL"]);
            for row in &output.events {
                events.add_row(vec![
                    row.tick.to_string(),
                    row.event.to_string(),
                    row.detail.clone().unwrap_or_default(),
                ]);
            }
            println!("{events}");

            let mut summary = table(&["TICKS", "SIM MS", "SLOTS", "BIT WRITES", "ROUND TRIP"]);
            summary.add_row(vec![
                output.ticks.to_string(),
                output.simulated_ms.to_string(),
                output.data_activations.to_string(),
                output.bit_writes.to_string(),
                output.round_trip.to_string(),
            ]);
            println!("{summary}");

            if !output.mismatches.is_empty() {
                let mut diffs = table(&["SOURCE", "VARIABLE", "SAVED", "LOADED"]);
                for m in &output.mismatches {
                    diffs.add_row(vec![
                        m.source.clone(),
                        m.variable.clone(),
                        m.saved.to_string(),
                        m.loaded
                            .as_ref()
                            .map_or_else(|| "-".to_string(), ToString::to_string),
                    ]);
                }
                println!("{diffs}");
            }
        }
        OutputFormat::Pretty => {
            for row in &output.events {
                match &row.detail {
                    Some(detail) => println!("tick {:>6}  {} ({detail})", row.tick, row.event),
                    None => println!("tick {:>6}  {}", row.tick, row.event),
                }
            }
            println!(
                "{} ticks, {} data activations, {} bit writes, round trip {}",
                output.ticks,
                output.data_activations,
                output.bit_writes,
                if output.round_trip { "ok" } else { "FAILED" }
            );
        }
    }
}
