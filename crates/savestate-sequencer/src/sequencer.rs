use std::time::Duration;

use bytes::{Bytes, BytesMut};
use savestate_buffer::{
    pack, slots_for, unpack, validate_instructions, Instruction, Layout, SourceProvider,
    SLOT_BYTES,
};
use savestate_codec::{AnyPlayer, PlayerLookup};
use savestate_transport::{read_slot, SlotTarget, SlotTransport};
use tracing::{debug, error, info, trace, warn};

use crate::config::SequencerConfig;
use crate::error::{Result, SequencerError};
use crate::event::{EventSink, Failure, SequencerEvent};
use crate::state::{FinalPhase, Operation, SavePhase, SequencerState, Status};

/// Answer to a save or load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Started,
    /// Another pass is moving data; nothing changed.
    Rejected,
}

/// Moves a packed buffer through storage slots, one step per tick.
///
/// A save clears each data slot and sets its 1-bits one per tick; a load
/// samples each slot as soon as it is active. Both end by switching back to
/// the fallback slot. At most one pass is in flight; a new request is
/// accepted once data transfer is over, dropping the pending `Post*` event.
pub struct ChunkSequencer<T, S, E> {
    config: SequencerConfig,
    instructions: Vec<Instruction>,
    byte_count: usize,
    data_slots: usize,
    transport: T,
    source: S,
    events: E,
    players: Box<dyn PlayerLookup>,
    state: SequencerState,
    outgoing: Bytes,
    incoming: BytesMut,
}

impl<T, S, E> ChunkSequencer<T, S, E>
where
    T: SlotTransport,
    S: SourceProvider,
    E: EventSink,
{
    /// Validate the instruction list and size the transfer.
    pub fn new(
        config: SequencerConfig,
        instructions: Vec<Instruction>,
        transport: T,
        source: S,
        events: E,
    ) -> Result<Self> {
        validate_instructions(&instructions)?;
        let byte_count = Layout::plan(&instructions).resolve_byte_count(config.byte_count)?;
        let data_slots = slots_for(byte_count);
        if data_slots > config.slot_count {
            return Err(SequencerError::SlotCapacity {
                bytes: byte_count,
                needed: data_slots,
                available: config.slot_count,
            });
        }

        Ok(Self {
            config,
            instructions,
            byte_count,
            data_slots,
            transport,
            source,
            events,
            players: Box::new(AnyPlayer),
            state: SequencerState::default(),
            outgoing: Bytes::new(),
            incoming: BytesMut::new(),
        })
    }

    /// Resolve restored player ids through `players` instead of accepting
    /// every non-negative id.
    pub fn with_players(mut self, players: impl PlayerLookup + 'static) -> Self {
        self.players = Box::new(players);
        self
    }

    /// Pack the current values and start writing them out.
    ///
    /// Pack errors are returned before any state changes.
    pub fn save(&mut self) -> Result<Request> {
        if self.state.status.is_transferring() {
            debug!(status = %self.state.status, "save rejected");
            return Ok(Request::Rejected);
        }

        let packed = pack(&self.instructions, &self.source)?.padded_to(self.byte_count)?;
        self.drop_pending_completion();
        self.outgoing = packed.into_bytes();
        self.state.reset_cursors();
        info!(bytes = self.byte_count, slots = self.data_slots, "save started");
        self.enter_slot(Operation::Save);
        Ok(Request::Started)
    }

    /// Start reading the buffer back from the data slots.
    pub fn load(&mut self) -> Request {
        if self.state.status.is_transferring() {
            debug!(status = %self.state.status, "load rejected");
            return Request::Rejected;
        }

        self.drop_pending_completion();
        self.incoming = BytesMut::with_capacity(self.byte_count);
        self.state.reset_cursors();
        info!(bytes = self.byte_count, slots = self.data_slots, "load started");
        self.enter_slot(Operation::Load);
        Request::Started
    }

    /// Advance one step. `elapsed` is the time since the previous tick.
    pub fn tick(&mut self, elapsed: Duration) {
        match self.state.status {
            Status::Idle => {}
            Status::Failed(_) => self.state.status = Status::Idle,
            Status::Saving(SavePhase::Locating) => {
                if self.transport.is_slot_ready() {
                    self.start_clearing();
                } else {
                    self.count_down(elapsed, Operation::Save);
                }
            }
            Status::Saving(SavePhase::Clearing) => {
                self.state.settle_remaining = self.state.settle_remaining.saturating_sub(1);
                if self.state.settle_remaining == 0 {
                    self.state.status = Status::Saving(SavePhase::Writing);
                    self.write_step();
                }
            }
            Status::Saving(SavePhase::Writing) => self.write_step(),
            Status::Loading => {
                if self.transport.is_slot_ready() {
                    self.read_step();
                } else {
                    self.count_down(elapsed, Operation::Load);
                }
            }
            Status::Finalizing(op, FinalPhase::Locating) => {
                if self.transport.is_slot_ready() {
                    trace!(%op, "fallback slot active");
                    self.state.status = Status::Finalizing(op, FinalPhase::Grace);
                    self.state.timeout_remaining = Some(self.config.grace_timeout);
                } else if self.expired(elapsed) {
                    warn!(%op, "fallback slot did not become active");
                    self.complete(op);
                }
            }
            Status::Finalizing(op, FinalPhase::Grace) => {
                if self.transport.is_slot_ready() {
                    trace!(%op, "fallback re-triggered, grace restarted");
                    self.state.timeout_remaining = Some(self.config.grace_timeout);
                } else if self.expired(elapsed) {
                    self.complete(op);
                }
            }
        }
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Bytes moved per pass.
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// Data slots used per pass.
    pub fn data_slots(&self) -> usize {
        self.data_slots
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn into_parts(self) -> (T, S, E) {
        (self.transport, self.source, self.events)
    }

    fn drop_pending_completion(&mut self) {
        if let Status::Finalizing(op, _) = self.state.status {
            debug!(%op, "new request while finalizing, completion event dropped");
        }
    }

    /// Switch to the current data slot, or finish once every slot is done.
    fn enter_slot(&mut self, op: Operation) {
        if self.state.slot_index >= self.data_slots {
            self.finish_transfer(op);
            return;
        }

        let slot = self.state.slot_index;
        debug!(%op, slot, "switching to data slot");
        self.transport.activate_slot(SlotTarget::Data(slot));
        self.state.byte_in_slot = 0;
        self.state.bit_in_byte = 0;
        self.state.timeout_remaining = Some(self.config.slot_timeout);
        self.state.status = match op {
            Operation::Save => Status::Saving(SavePhase::Locating),
            Operation::Load => Status::Loading,
        };
    }

    fn start_clearing(&mut self) {
        debug!(slot = self.state.slot_index, "data slot active, clearing");
        self.transport.clear_parameters();
        self.state.timeout_remaining = None;
        self.state.settle_remaining = self.config.clear_settle_ticks;
        if self.state.settle_remaining == 0 {
            self.state.status = Status::Saving(SavePhase::Writing);
            self.write_step();
        } else {
            self.state.status = Status::Saving(SavePhase::Clearing);
        }
    }

    /// Skip 0-bits and set the next 1-bit of the current chunk; move to the
    /// next slot once the chunk is exhausted.
    fn write_step(&mut self) {
        let start = self.state.slot_index * SLOT_BYTES;
        let chunk = self.outgoing.slice(start..(start + SLOT_BYTES).min(self.outgoing.len()));

        while let Some(&byte) = chunk.get(self.state.byte_in_slot) {
            let bit = self.state.bit_in_byte;
            let index = self.state.byte_in_slot * 8 + usize::from(bit);
            if bit == 7 {
                self.state.bit_in_byte = 0;
                self.state.byte_in_slot += 1;
            } else {
                self.state.bit_in_byte += 1;
            }
            if (byte >> bit) & 1 == 1 {
                self.transport.set_parameter_bit(index, true);
                return;
            }
        }

        debug!(slot = self.state.slot_index, bytes = chunk.len(), "chunk written");
        self.state.slot_index += 1;
        self.enter_slot(Operation::Save);
    }

    fn read_step(&mut self) {
        let sampled = read_slot(&self.transport);
        let take = (self.byte_count - self.incoming.len()).min(SLOT_BYTES);
        self.incoming.extend_from_slice(&sampled[..take]);
        self.state.byte_in_slot = take;
        debug!(slot = self.state.slot_index, bytes = take, "chunk read");
        self.state.slot_index += 1;
        self.enter_slot(Operation::Load);
    }

    fn finish_transfer(&mut self, op: Operation) {
        match op {
            Operation::Save => {
                info!(bytes = self.byte_count, "save complete");
                self.events.on_event(SequencerEvent::Saved);
            }
            Operation::Load => {
                let buffer = std::mem::take(&mut self.incoming).freeze();
                match unpack(
                    &buffer,
                    &self.instructions,
                    &mut self.source,
                    self.players.as_ref(),
                ) {
                    Ok(report) => {
                        info!(
                            applied = report.applied,
                            ignored = report.ignored,
                            "load complete"
                        );
                        self.events.on_event(SequencerEvent::Loaded(report));
                    }
                    Err(err) => {
                        self.fail(Operation::Load, Failure::Decode(err.to_string()));
                        return;
                    }
                }
            }
        }

        debug!(%op, "switching to fallback slot");
        self.transport.activate_slot(SlotTarget::Fallback);
        self.state.timeout_remaining = Some(self.config.slot_timeout);
        self.state.status = Status::Finalizing(op, FinalPhase::Locating);
    }

    fn complete(&mut self, op: Operation) {
        debug!(%op, "pass finished");
        self.state.timeout_remaining = None;
        self.state.status = Status::Idle;
        self.events.on_event(match op {
            Operation::Save => SequencerEvent::PostSave,
            Operation::Load => SequencerEvent::PostLoad,
        });
    }

    fn count_down(&mut self, elapsed: Duration, op: Operation) {
        if self.expired(elapsed) {
            let target = SlotTarget::Data(self.state.slot_index);
            self.fail(op, Failure::Timeout(target));
        }
    }

    fn expired(&mut self, elapsed: Duration) -> bool {
        match self.state.timeout_remaining {
            Some(remaining) => {
                let left = remaining.saturating_sub(elapsed);
                self.state.timeout_remaining = Some(left);
                left.is_zero()
            }
            None => false,
        }
    }

    /// Abort the pass and head back to the fallback slot without waiting.
    fn fail(&mut self, op: Operation, failure: Failure) {
        error!(%op, slot = self.state.slot_index, %failure, "pass failed");
        self.transport.activate_slot(SlotTarget::Fallback);
        self.state.timeout_remaining = None;
        self.state.status = Status::Failed(op);
        self.events.on_event(match op {
            Operation::Save => SequencerEvent::SaveFailed(failure),
            Operation::Load => SequencerEvent::LoadFailed(failure),
        });
    }
}

#[cfg(test)]
mod tests {
    use savestate_buffer::{MemorySource, PackedBuffer};
    use savestate_codec::{TypeTag, Value, Vector3};
    use savestate_transport::{SimulatedTransport, SimulatedTransportConfig};

    use super::*;

    const TICK: Duration = Duration::from_secs(1);

    type Seq = ChunkSequencer<SimulatedTransport, MemorySource, Vec<SequencerEvent>>;

    fn health_and_pos() -> (Vec<Instruction>, MemorySource) {
        let instructions = vec![
            Instruction::new("src1", "health", TypeTag::Int32),
            Instruction::new("src1", "pos", TypeTag::Vector3),
        ];
        let mut mem = MemorySource::new();
        mem.insert("src1", "health", Value::Int32(1_000_000_000));
        mem.insert(
            "src1",
            "pos",
            Value::Vector3(Vector3 {
                x: 1.5,
                y: -2.25,
                z: 0.0,
            }),
        );
        (instructions, mem)
    }

    /// 18 u32 fields: 72 bytes over three slots.
    fn wide() -> (Vec<Instruction>, MemorySource) {
        let mut instructions = Vec::new();
        let mut mem = MemorySource::new();
        for i in 0..18u32 {
            let name = format!("w{i}");
            instructions.push(Instruction::new("s", name.as_str(), TypeTag::UInt32));
            mem.insert("s", name, Value::UInt32(i.wrapping_mul(0x0102_0304) ^ 0x8000_0001));
        }
        (instructions, mem)
    }

    fn sequencer(
        instructions: Vec<Instruction>,
        mem: MemorySource,
        transport: SimulatedTransportConfig,
    ) -> Seq {
        ChunkSequencer::new(
            SequencerConfig::default(),
            instructions,
            SimulatedTransport::new(transport),
            mem,
            Vec::new(),
        )
        .unwrap()
    }

    fn run(seq: &mut Seq) -> usize {
        for ticks in 1..=100_000 {
            seq.tick(TICK);
            if seq.status().is_idle() {
                return ticks;
            }
        }
        panic!("sequencer never returned to idle");
    }

    fn packed(instructions: &[Instruction], mem: &MemorySource) -> PackedBuffer {
        pack(instructions, mem).unwrap()
    }

    #[test]
    fn save_uses_one_data_slot_per_chunk() {
        let (instructions, mem) = wide();
        let expected = packed(&instructions, &mem);
        let mut seq = sequencer(instructions, mem, SimulatedTransportConfig::default());
        assert_eq!(seq.data_slots(), 3);

        assert_eq!(seq.save().unwrap(), Request::Started);
        run(&mut seq);

        let transport = seq.transport();
        assert_eq!(transport.data_activations(), 3);
        assert_eq!(transport.activations().last(), Some(&SlotTarget::Fallback));
        for (index, chunk) in expected.slots().enumerate() {
            let stored = transport.slot_bytes(index).unwrap();
            assert_eq!(&stored[..chunk.len()], chunk);
            assert!(stored[chunk.len()..].iter().all(|b| *b == 0));
        }
        assert_eq!(seq.events(), &vec![SequencerEvent::Saved, SequencerEvent::PostSave]);
    }

    #[test]
    fn at_most_one_bit_per_tick() {
        let (instructions, mem) = wide();
        let ones: u32 = packed(&instructions, &mem)
            .as_bytes()
            .iter()
            .map(|b| b.count_ones())
            .sum();
        let mut seq = sequencer(instructions, mem, SimulatedTransportConfig::default());
        seq.save().unwrap();

        let mut writes = 0;
        while !seq.status().is_idle() {
            seq.tick(TICK);
            let now = seq.transport().bit_writes();
            assert!(now - writes <= 1);
            writes = now;
        }
        assert_eq!(writes, ones as usize);
    }

    #[test]
    fn clear_settles_before_writing() {
        let (instructions, mem) = health_and_pos();
        let mut seq = sequencer(instructions, mem, SimulatedTransportConfig::default());
        seq.save().unwrap();

        seq.tick(TICK);
        assert_eq!(seq.status(), Status::Saving(SavePhase::Clearing));
        assert_eq!(seq.transport().clears(), 1);
        seq.tick(TICK);
        assert_eq!(seq.status(), Status::Saving(SavePhase::Clearing));
        assert_eq!(seq.transport().bit_writes(), 0);
        // second tick after the clear writes the first 1-bit
        seq.tick(TICK);
        assert_eq!(seq.status(), Status::Saving(SavePhase::Writing));
        assert_eq!(seq.transport().bit_writes(), 1);
    }

    #[test]
    fn zero_settle_writes_with_the_clear() {
        let (instructions, mem) = health_and_pos();
        let config = SequencerConfig {
            clear_settle_ticks: 0,
            ..Default::default()
        };
        let mut seq = ChunkSequencer::new(
            config,
            instructions,
            SimulatedTransport::default(),
            mem,
            Vec::new(),
        )
        .unwrap();
        seq.save().unwrap();

        seq.tick(TICK);
        assert_eq!(seq.status(), Status::Saving(SavePhase::Writing));
        assert_eq!(seq.transport().clears(), 1);
        assert_eq!(seq.transport().bit_writes(), 1);
    }

    #[test]
    fn empty_list_completes_inside_the_request() {
        let mut seq = sequencer(
            Vec::new(),
            MemorySource::new(),
            SimulatedTransportConfig::default(),
        );
        assert_eq!(seq.byte_count(), 0);
        assert_eq!(seq.data_slots(), 0);

        assert_eq!(seq.save().unwrap(), Request::Started);
        assert_eq!(seq.events(), &vec![SequencerEvent::Saved]);
        assert_eq!(
            seq.status(),
            Status::Finalizing(Operation::Save, FinalPhase::Locating)
        );
        run(&mut seq);

        assert_eq!(seq.load(), Request::Started);
        assert!(matches!(
            seq.events().last(),
            Some(SequencerEvent::Loaded(report)) if report.applied == 0
        ));
        run(&mut seq);

        let names: Vec<_> = seq.events().iter().map(SequencerEvent::name).collect();
        assert_eq!(names, vec!["saved", "post_save", "loaded", "post_load"]);
        assert_eq!(seq.transport().data_activations(), 0);
    }

    #[test]
    fn save_while_saving_is_rejected_and_keeps_cursors() {
        let (instructions, mem) = wide();
        let mut seq = sequencer(instructions, mem, SimulatedTransportConfig::default());
        seq.save().unwrap();
        for _ in 0..20 {
            seq.tick(TICK);
        }
        assert_eq!(seq.status(), Status::Saving(SavePhase::Writing));
        let before = seq.state().clone();
        assert!(before.byte_in_slot > 0 || before.bit_in_byte > 0);

        assert_eq!(seq.save().unwrap(), Request::Rejected);
        assert_eq!(seq.load(), Request::Rejected);
        assert_eq!(seq.state(), &before);
    }

    #[test]
    fn save_then_load_restores_values() {
        let (instructions, mem) = health_and_pos();
        let mut seq = sequencer(instructions, mem.clone(), SimulatedTransportConfig::default());
        seq.save().unwrap();
        run(&mut seq);

        seq.source_mut().insert("src1", "health", Value::Int32(0));
        seq.source_mut().insert("src1", "pos", Value::Vector3(Vector3::default()));

        assert_eq!(seq.load(), Request::Started);
        run(&mut seq);

        assert_eq!(seq.source(), &mem);
        let events = seq.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[2], SequencerEvent::Loaded(report) if report.applied == 2));
        assert_eq!(events[3], SequencerEvent::PostLoad);
    }

    #[test]
    fn load_reads_only_reserved_bytes() {
        let instructions = vec![
            Instruction::new("s", "ratio", TypeTag::Float64),
            Instruction::new("s", "count", TypeTag::UInt16),
        ];
        let mut mem = MemorySource::new();
        mem.insert("s", "ratio", Value::Float64(-1234.5678e-9));
        mem.insert("s", "count", Value::UInt16(4242));
        let config = SequencerConfig {
            byte_count: Some(40),
            ..Default::default()
        };
        let mut seq = ChunkSequencer::new(
            config,
            instructions,
            SimulatedTransport::default(),
            mem.clone(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(seq.data_slots(), 2);

        seq.save().unwrap();
        run(&mut seq);
        seq.source_mut().insert("s", "count", Value::UInt16(0));
        seq.load();
        run(&mut seq);

        assert_eq!(seq.source(), &mem);
        assert_eq!(seq.state().byte_in_slot, 8);
    }

    #[test]
    fn stalled_slot_times_out_then_idles() {
        let (instructions, mem) = wide();
        let mut seq = sequencer(
            instructions,
            mem,
            SimulatedTransportConfig {
                stalled_slots: vec![1],
                ..Default::default()
            },
        );
        seq.save().unwrap();

        let mut ticks = 0;
        while !matches!(seq.status(), Status::Failed(_)) {
            seq.tick(TICK);
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert_eq!(seq.status(), Status::Failed(Operation::Save));
        assert_eq!(
            seq.events().last(),
            Some(&SequencerEvent::SaveFailed(Failure::Timeout(SlotTarget::Data(1))))
        );
        assert_eq!(seq.transport().activations().last(), Some(&SlotTarget::Fallback));

        seq.tick(TICK);
        assert!(seq.status().is_idle());
        assert!(!seq.events().contains(&SequencerEvent::Saved));
    }

    #[test]
    fn timeout_takes_thirty_seconds() {
        let (instructions, mem) = health_and_pos();
        let mut seq = sequencer(
            instructions,
            mem,
            SimulatedTransportConfig {
                stalled_slots: vec![0],
                ..Default::default()
            },
        );
        seq.load();
        for _ in 0..29 {
            seq.tick(TICK);
        }
        assert_eq!(seq.status(), Status::Loading);
        seq.tick(TICK);
        assert_eq!(seq.status(), Status::Failed(Operation::Load));
        assert_eq!(
            seq.events(),
            &vec![SequencerEvent::LoadFailed(Failure::Timeout(SlotTarget::Data(0)))]
        );
    }

    fn ticks_from_saved_to_post_save(retriggers: u32) -> usize {
        let (instructions, mem) = health_and_pos();
        let mut seq = sequencer(
            instructions,
            mem,
            SimulatedTransportConfig {
                fallback_retriggers: retriggers,
                ..Default::default()
            },
        );
        seq.save().unwrap();
        while seq.events().is_empty() {
            seq.tick(TICK);
        }
        assert_eq!(seq.events(), &vec![SequencerEvent::Saved]);
        let ticks = run(&mut seq);
        assert_eq!(seq.events().last(), Some(&SequencerEvent::PostSave));
        ticks
    }

    #[test]
    fn retriggers_restart_grace() {
        let quiet = ticks_from_saved_to_post_save(0);
        // fallback lands, then two seconds of grace
        assert_eq!(quiet, 3);
        assert_eq!(ticks_from_saved_to_post_save(3), quiet + 3);
    }

    #[test]
    fn request_while_finalizing_drops_completion() {
        let (instructions, mem) = health_and_pos();
        let mut seq = sequencer(instructions, mem, SimulatedTransportConfig::default());
        seq.save().unwrap();
        while seq.events().is_empty() {
            seq.tick(TICK);
        }
        assert!(matches!(seq.status(), Status::Finalizing(Operation::Save, _)));

        assert_eq!(seq.load(), Request::Started);
        run(&mut seq);
        let names: Vec<_> = seq.events().iter().map(SequencerEvent::name).collect();
        assert_eq!(names, vec!["saved", "loaded", "post_load"]);
    }

    #[test]
    fn undecodable_load_reports_failure() {
        let instructions = vec![Instruction::new("s", "ratio", TypeTag::Float64)];
        let config = SequencerConfig {
            byte_count: Some(32),
            ..Default::default()
        };
        let mut seq = ChunkSequencer::new(
            config,
            instructions,
            SimulatedTransport::default(),
            MemorySource::new(),
            Vec::new(),
        )
        .unwrap();
        seq.transport_mut().store_slot(0, &[0xFF; 32]);

        seq.load();
        run(&mut seq);
        assert!(matches!(
            seq.events().as_slice(),
            [SequencerEvent::LoadFailed(Failure::Decode(_))]
        ));
    }

    #[test]
    fn pack_errors_surface_from_save() {
        let instructions = vec![Instruction::new("s", "speed", TypeTag::Float32)];
        let mut mem = MemorySource::new();
        mem.insert("s", "speed", Value::Int32(3));
        let mut seq = sequencer(instructions, mem, SimulatedTransportConfig::default());

        assert!(matches!(seq.save(), Err(SequencerError::Buffer(_))));
        assert!(seq.status().is_idle());
        assert!(seq.transport().activations().is_empty());
    }

    #[test]
    fn too_few_slots_is_rejected() {
        let (instructions, mem) = wide();
        let config = SequencerConfig {
            slot_count: 2,
            ..Default::default()
        };
        let result = ChunkSequencer::new(
            config,
            instructions,
            SimulatedTransport::default(),
            mem,
            Vec::<SequencerEvent>::new(),
        );
        assert!(matches!(
            result,
            Err(SequencerError::SlotCapacity {
                bytes: 72,
                needed: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn invalid_instructions_fail_at_construction() {
        let mut instructions = health_and_pos().0;
        instructions[0].source = None;
        let result = ChunkSequencer::new(
            SequencerConfig::default(),
            instructions,
            SimulatedTransport::default(),
            MemorySource::new(),
            (),
        );
        assert!(matches!(result, Err(SequencerError::Buffer(_))));
    }
}
