use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{error, warn};

use crate::event_bus::{Event, EventBus, Severity};
use crate::revision::Revision;

type Sink = Rc<dyn Fn(&Event)>;

/// Shared diagnostics handle.
///
/// Cloning is cheap and every clone feeds the same [`EventBus`], so async
/// tasks can report failures after the call that spawned them has returned.
/// Every report is also emitted through `tracing`.
#[derive(Clone, Default)]
pub struct Reporter {
    bus: Rc<RefCell<EventBus>>,
    sink: Option<Sink>,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("events", &self.bus.borrow().events().len())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also forwards each event to `sink`, e.g. a browser console.
    pub fn with_sink(sink: impl Fn(&Event) + 'static) -> Self {
        Self {
            bus: Rc::default(),
            sink: Some(Rc::new(sink)),
        }
    }

    pub fn warn(&self, revision: Revision, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        warn!(revision = revision.index, kind, "{message}");
        self.record(revision, Severity::Warn, kind, message);
    }

    pub fn error(&self, revision: Revision, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        error!(revision = revision.index, kind, "{message}");
        self.record(revision, Severity::Error, kind, message);
    }

    fn record(&self, revision: Revision, severity: Severity, kind: &'static str, message: String) {
        let event = Event {
            revision,
            severity,
            kind,
            message,
        };
        if let Some(sink) = &self.sink {
            sink(&event);
        }
        self.bus
            .borrow_mut()
            .emit(event.revision, event.severity, event.kind, event.message);
    }

    pub fn events(&self) -> Vec<Event> {
        self.bus.borrow().events().iter().cloned().collect()
    }

    pub fn error_count(&self) -> usize {
        self.bus.borrow().count(Severity::Error)
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.bus.borrow().count_kind(kind)
    }

    pub fn drain(&self) -> Vec<Event> {
        self.bus.borrow_mut().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::Reporter;
    use crate::revision::Revision;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn clones_share_one_bus() {
        let a = Reporter::new();
        let b = a.clone();
        b.error(Revision::new(3), "scene.go_to", "renderer fault");
        a.warn(Revision::new(3), "pose", "degraded");
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.events().len(), 2);
        assert_eq!(b.drain().len(), 2);
        assert!(a.events().is_empty());
    }

    #[test]
    fn forwards_to_sink() {
        let seen = Rc::new(Cell::new(0));
        let seen_in_sink = seen.clone();
        let reporter = Reporter::with_sink(move |_| seen_in_sink.set(seen_in_sink.get() + 1));
        reporter.error(Revision::MOUNT, "vr.mount", "missing node");
        assert_eq!(seen.get(), 1);
        assert_eq!(reporter.count_kind("vr.mount"), 1);
    }
}
