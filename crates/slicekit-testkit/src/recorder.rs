//! Diagnostic sink that keeps every snapshot it receives.

use parking_lot::Mutex;
use slicekit::{DiagnosticSink, SliceSnapshot};
use std::sync::Arc;

/// Records snapshots for later assertions. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    snapshots: Arc<Mutex<Vec<SliceSnapshot>>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().is_empty()
    }

    /// Copy of every recorded snapshot.
    pub fn snapshots(&self) -> Vec<SliceSnapshot> {
        self.snapshots.lock().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, snapshot: &SliceSnapshot) {
        self.snapshots.lock().push(snapshot.clone());
    }
}
