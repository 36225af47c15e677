//! Observation hook for lowering decisions
//!
//! The class-container policy makes choices a caller may want to see, such
//! as synthesizing `GlobalScope` or truncating a mixed sequence. Those
//! choices are reported as [`LoweringEvent`]s to a [`LoweringObserver`]
//! instead of being logged inline.

use std::sync::{Mutex, PoisonError};
use ufc_iast::NodeShape;

/// A decision taken while lowering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoweringEvent {
    /// Class-container lowering received a sequence
    SequenceReceived {
        /// Number of nodes in the sequence
        len: usize,
    },
    /// Top-level functions were grouped into `GlobalScope`
    GlobalScopeSynthesized {
        /// Number of grouped functions
        functions: usize,
    },
    /// A non-uniform sequence was reduced to its first node
    MixedSequenceTruncated {
        /// Number of nodes in the sequence
        len: usize,
        /// Shape of the node that was kept
        kept: NodeShape,
    },
    /// A single top-level function was wrapped in `GlobalScope`
    FunctionWrapped {
        /// Function name
        name: String,
    },
    /// A body statement with no canonical counterpart was dropped
    StatementSkipped {
        /// Enclosing function
        function: String,
        /// Shape of the dropped statement
        shape: NodeShape,
    },
    /// A source class was lowered
    ClassLowered {
        /// Class name
        name: String,
        /// Number of lowered methods
        methods: usize,
    },
}

/// Receives [`LoweringEvent`]s
///
/// Observers are shared across threads when units are lowered in parallel.
pub trait LoweringObserver: Send + Sync {
    /// Called once per event, in the order decisions are taken
    fn on_event(&self, event: &LoweringEvent);
}

/// Forwards events to `tracing` under the `ufc::lower` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LoweringObserver for TracingObserver {
    fn on_event(&self, event: &LoweringEvent) {
        match event {
            LoweringEvent::SequenceReceived { len } => {
                tracing::debug!(target: "ufc::lower", len, "lowering node sequence");
            }
            LoweringEvent::GlobalScopeSynthesized { functions } => {
                tracing::debug!(target: "ufc::lower", functions, "grouped functions into GlobalScope");
            }
            LoweringEvent::MixedSequenceTruncated { len, kept } => {
                tracing::warn!(
                    target: "ufc::lower",
                    len,
                    kept = %kept,
                    "mixed sequence reduced to its first node"
                );
            }
            LoweringEvent::FunctionWrapped { name } => {
                tracing::debug!(target: "ufc::lower", name = %name, "wrapped function in GlobalScope");
            }
            LoweringEvent::StatementSkipped { function, shape } => {
                tracing::trace!(
                    target: "ufc::lower",
                    function = %function,
                    shape = %shape,
                    "skipped unmapped statement"
                );
            }
            LoweringEvent::ClassLowered { name, methods } => {
                tracing::debug!(target: "ufc::lower", name = %name, methods, "lowered class");
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LoweringObserver for NoopObserver {
    fn on_event(&self, _event: &LoweringEvent) {}
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LoweringEvent>>,
}

impl RecordingObserver {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far
    #[must_use]
    pub fn events(&self) -> Vec<LoweringEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LoweringObserver for RecordingObserver {
    fn on_event(&self, event: &LoweringEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn every_event() -> Vec<LoweringEvent> {
        vec![
            LoweringEvent::SequenceReceived { len: 2 },
            LoweringEvent::GlobalScopeSynthesized { functions: 2 },
            LoweringEvent::MixedSequenceTruncated {
                len: 2,
                kept: NodeShape::Class,
            },
            LoweringEvent::FunctionWrapped {
                name: "main".to_string(),
            },
            LoweringEvent::StatementSkipped {
                function: "main".to_string(),
                shape: NodeShape::Unknown("goto".to_string()),
            },
            LoweringEvent::ClassLowered {
                name: "Foo".to_string(),
                methods: 1,
            },
        ]
    }

    #[test]
    fn recorder_keeps_order() {
        let recorder = RecordingObserver::new();
        for event in every_event() {
            recorder.on_event(&event);
        }
        assert_eq!(recorder.events(), every_event());
    }

    #[test]
    fn observers_are_interchangeable() {
        let observers: Vec<Arc<dyn LoweringObserver>> = vec![
            Arc::new(TracingObserver),
            Arc::new(NoopObserver),
            Arc::new(RecordingObserver::new()),
        ];
        for observer in &observers {
            for event in every_event() {
                observer.on_event(&event);
            }
        }
    }

    #[test]
    fn recorder_is_shared_across_threads() {
        let recorder = Arc::new(RecordingObserver::new());
        std::thread::scope(|scope| {
            for len in 0..4 {
                let recorder = Arc::clone(&recorder);
                let _worker = scope.spawn(move || {
                    recorder.on_event(&LoweringEvent::SequenceReceived { len });
                });
            }
        });
        assert_eq!(recorder.events().len(), 4);
    }
}
