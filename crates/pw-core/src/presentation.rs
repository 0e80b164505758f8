//! Write-only outputs pushed by the coordinator after every cascade

use std::sync::Arc;

use parking_lot::Mutex;

use crate::analytics::{Aggregate, RegressionModel};
use crate::record::{FieldId, RecordIdx};

/// Aggregate of one displayed field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub field: FieldId,
    pub aggregate: Aggregate,
}

/// Holder of the lowest value of the performance field
#[derive(Debug, Clone, PartialEq)]
pub struct BestPerformer {
    pub record: RecordIdx,
    /// Tag value identifying the performer (driver code)
    pub name: String,
    pub value: f64,
    pub lap: f64,
}

/// Regression slope in display units
#[derive(Debug, Clone, PartialEq)]
pub struct Degradation {
    pub model: RegressionModel,
    pub scaled_slope: f64,
    pub unit: String,
}

/// Scalars shown by the presentation surface
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Readout {
    /// Size of the effective selection
    pub selected: usize,
    /// No active brush
    pub everything: bool,
    pub summaries: Vec<FieldSummary>,
    pub best: Option<BestPerformer>,
    /// `None` while the regression display is suppressed
    pub degradation: Option<Degradation>,
}

impl Readout {
    pub fn summary(&self, field: FieldId) -> Option<&Aggregate> {
        self.summaries
            .iter()
            .find(|s| s.field == field)
            .map(|s| &s.aggregate)
    }

    pub fn mean(&self, field: FieldId) -> Option<f64> {
        self.summary(field).and_then(Aggregate::mean)
    }
}

/// Consumer of readouts
pub trait PresentationSink: Send {
    fn present(&mut self, readout: &Readout);
}

/// Sink that keeps every readout it receives
#[derive(Debug, Clone, Default)]
pub struct ReadoutLog {
    entries: Arc<Mutex<Vec<Readout>>>,
}

impl ReadoutLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Readout> {
        self.entries.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn entries(&self) -> Vec<Readout> {
        self.entries.lock().clone()
    }
}

impl PresentationSink for ReadoutLog {
    fn present(&mut self, readout: &Readout) {
        self.entries.lock().push(readout.clone());
    }
}
