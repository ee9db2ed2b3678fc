use std::collections::BTreeMap;

use savestate_codec::Value;

use crate::instruction::SourceId;

/// Result of writing a value back to a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Applied,
    /// The source or variable no longer exists; the write was dropped.
    Ignored,
}

/// Reads and writes named values on external objects.
pub trait SourceProvider {
    /// Current value, or `None` if the source or variable is absent.
    fn get(&self, source: &SourceId, name: &str) -> Option<Value>;

    /// Write a value back.
    fn set(&mut self, source: &SourceId, name: &str, value: Value) -> SetOutcome;
}

impl<T: SourceProvider + ?Sized> SourceProvider for &mut T {
    fn get(&self, source: &SourceId, name: &str) -> Option<Value> {
        (**self).get(source, name)
    }

    fn set(&mut self, source: &SourceId, name: &str, value: Value) -> SetOutcome {
        (**self).set(source, name, value)
    }
}

impl<T: SourceProvider + ?Sized> SourceProvider for Box<T> {
    fn get(&self, source: &SourceId, name: &str) -> Option<Value> {
        (**self).get(source, name)
    }

    fn set(&mut self, source: &SourceId, name: &str, value: Value) -> SetOutcome {
        (**self).set(source, name, value)
    }
}

/// In-memory sources keyed by id, each holding named values.
///
/// Writes to a source that was never registered (or has been removed) are
/// ignored, mirroring an object that disappeared between save and load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySource {
    sources: BTreeMap<SourceId, BTreeMap<String, Value>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty source. Existing values are kept.
    pub fn add_source(&mut self, source: impl Into<SourceId>) {
        self.sources.entry(source.into()).or_default();
    }

    /// Remove a source and all its values.
    pub fn remove_source(&mut self, source: &SourceId) -> bool {
        self.sources.remove(source).is_some()
    }

    pub fn contains_source(&self, source: &SourceId) -> bool {
        self.sources.contains_key(source)
    }

    /// Store a value, registering the source if needed.
    pub fn insert(&mut self, source: impl Into<SourceId>, name: impl Into<String>, value: Value) {
        self.sources
            .entry(source.into())
            .or_default()
            .insert(name.into(), value);
    }

    pub fn value(&self, source: &SourceId, name: &str) -> Option<&Value> {
        self.sources.get(source)?.get(name)
    }

    /// Iterate over `(source, variable, value)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&SourceId, &str, &Value)> {
        self.sources.iter().flat_map(|(source, vars)| {
            vars.iter()
                .map(move |(name, value)| (source, name.as_str(), value))
        })
    }
}

impl SourceProvider for MemorySource {
    fn get(&self, source: &SourceId, name: &str) -> Option<Value> {
        self.value(source, name).cloned()
    }

    fn set(&mut self, source: &SourceId, name: &str, value: Value) -> SetOutcome {
        match self.sources.get_mut(source) {
            Some(vars) => {
                vars.insert(name.to_string(), value);
                SetOutcome::Applied
            }
            None => SetOutcome::Ignored,
        }
    }
}
