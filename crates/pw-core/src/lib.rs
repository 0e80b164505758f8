//! Core functionality for the lap analysis dashboard
//!
//! This crate owns the record arena, the shared selection, the derived
//! analytics (aggregates and least-squares regression) and the coordinator
//! that keeps every linked view consistent with the current brush.

pub mod analytics;
pub mod command;
pub mod drill;
pub mod error;
pub mod events;
pub mod presentation;
pub mod record;
pub mod selection;
pub mod state;
pub mod sync;
pub mod view;

// Re-export commonly used types
pub use analytics::{Aggregate, AggregateSnapshot, NoFit, RegressionModel};
pub use command::{Command, GestureEvent};
pub use drill::{DrillFocus, FocusError};
pub use error::CoordinatorError;
pub use events::EventBus;
pub use presentation::{PresentationSink, Readout, ReadoutLog};
pub use record::{FieldId, Record, RecordIdx, RecordSet, RecordStore, TagId};
pub use selection::Selection;
pub use state::{AnalyticsSettings, DashboardSettings, RegressionSettings};
pub use sync::SelectionCoordinator;
pub use view::{DisplayMode, ViewAdapter, ViewId};
