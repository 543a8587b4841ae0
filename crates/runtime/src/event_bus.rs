use std::collections::{BTreeMap, VecDeque};

use crate::revision::Revision;

/// Events kept by [`EventBus::new`] before the oldest are evicted.
pub const DEFAULT_RETAINED_EVENTS: usize = 256;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warn,
    Error,
}

/// A recorded diagnostic.
///
/// `kind` is a stable, greppable tag such as `"scene.go_to"`; `message` is
/// free-form text for humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub revision: Revision,
    pub severity: Severity,
    pub kind: &'static str,
    pub message: String,
}

/// Keeps the most recent events plus lifetime counts.
///
/// Counts cover every event ever emitted, including evicted and drained ones,
/// so they stay meaningful on a page that runs for hours.
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<Event>,
    capacity: usize,
    by_severity: BTreeMap<Severity, usize>,
    by_kind: BTreeMap<&'static str, usize>,
    evicted: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RETAINED_EVENTS)
    }

    /// A capacity of zero keeps counts only.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_RETAINED_EVENTS)),
            capacity,
            by_severity: BTreeMap::new(),
            by_kind: BTreeMap::new(),
            evicted: 0,
        }
    }

    pub fn emit(
        &mut self,
        revision: Revision,
        severity: Severity,
        kind: &'static str,
        message: impl Into<String>,
    ) {
        *self.by_severity.entry(severity).or_default() += 1;
        *self.by_kind.entry(kind).or_default() += 1;
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
        self.events.push_back(Event {
            revision,
            severity,
            kind,
            message: message.into(),
        });
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> &VecDeque<Event> {
        &self.events
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events dropped to stay within capacity.
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.by_kind.get(kind).copied().unwrap_or(0)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}
