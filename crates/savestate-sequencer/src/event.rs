use std::fmt;

use savestate_buffer::UnpackReport;
use savestate_transport::SlotTarget;

use crate::state::Operation;

/// Why a pass aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The slot switch did not land within the slot timeout.
    Timeout(SlotTarget),
    /// The loaded buffer could not be unpacked.
    Decode(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Timeout(target) => write!(f, "timed out waiting for {target}"),
            Failure::Decode(message) => write!(f, "decode failed: {message}"),
        }
    }
}

/// Outcome notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Every chunk has been written.
    Saved,
    /// Every chunk has been read and unpacked into the sources.
    Loaded(UnpackReport),
    SaveFailed(Failure),
    LoadFailed(Failure),
    /// Back on the fallback slot after a save.
    PostSave,
    /// Back on the fallback slot after a load.
    PostLoad,
}

impl SequencerEvent {
    pub fn operation(&self) -> Operation {
        match self {
            SequencerEvent::Saved | SequencerEvent::SaveFailed(_) | SequencerEvent::PostSave => {
                Operation::Save
            }
            SequencerEvent::Loaded(_)
            | SequencerEvent::LoadFailed(_)
            | SequencerEvent::PostLoad => Operation::Load,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SequencerEvent::Saved => "saved",
            SequencerEvent::Loaded(_) => "loaded",
            SequencerEvent::SaveFailed(_) => "save_failed",
            SequencerEvent::LoadFailed(_) => "load_failed",
            SequencerEvent::PostSave => "post_save",
            SequencerEvent::PostLoad => "post_load",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SequencerEvent::SaveFailed(_) | SequencerEvent::LoadFailed(_)
        )
    }
}

/// Receives sequencer events.
pub trait EventSink {
    fn on_event(&mut self, event: SequencerEvent);
}

impl EventSink for Vec<SequencerEvent> {
    fn on_event(&mut self, event: SequencerEvent) {
        self.push(event);
    }
}

impl EventSink for () {
    fn on_event(&mut self, _event: SequencerEvent) {}
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn on_event(&mut self, event: SequencerEvent) {
        (**self).on_event(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn on_event(&mut self, event: SequencerEvent) {
        (**self).on_event(event)
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct EventFn<F>(pub F);

impl<F: FnMut(SequencerEvent)> EventSink for EventFn<F> {
    fn on_event(&mut self, event: SequencerEvent) {
        (self.0)(event)
    }
}
