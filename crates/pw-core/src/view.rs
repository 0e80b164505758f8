//! View adapter abstraction - the capability set shared by every linked chart

use std::any::Any;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command::{Command, GestureEvent};
use crate::drill::{DrillFocus, FocusError};
use crate::record::RecordSet;

/// Unique identifier for a view
pub type ViewId = Uuid;

/// Vertical encoding of a time-series view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Raw metric (lap time in seconds)
    #[default]
    Continuous,
    /// Ordinal rank (race position)
    Rank,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Continuous => DisplayMode::Rank,
            DisplayMode::Rank => DisplayMode::Continuous,
        }
    }
}

/// Base trait for all linked views
///
/// Views never mutate the shared selection. They propose one by returning a
/// [`Command`] from [`ViewAdapter::on_gesture`] when a gesture completes.
pub trait ViewAdapter: Send {
    /// Get the unique ID of this view
    fn id(&self) -> ViewId;

    /// Get the display name
    fn display_name(&self) -> &str;

    /// Get the view type (for logging)
    fn view_type(&self) -> &str;

    /// Full redraw from a subset, discarding previously rendered marks
    fn render(&mut self, records: &RecordSet);

    /// Restyle already rendered marks; a full-store set means uniform baseline
    fn set_highlight(&mut self, selection: &RecordSet);

    /// Handle a pointer gesture; only terminal events may yield a command
    fn on_gesture(&mut self, gesture: &GestureEvent) -> Option<Command>;

    /// Whether the view keeps a drill-down focus
    fn supports_drill_focus(&self) -> bool {
        self.drill_focus().is_some()
    }

    fn drill_focus(&self) -> Option<&DrillFocus> {
        None
    }

    /// Re-derive the drill focus from the effective selection
    fn narrow(&mut self, _selection: &RecordSet) {}

    fn focus_on(&mut self, _value: &str) -> Result<(), FocusError> {
        Err(FocusError::Unsupported)
    }

    fn step_focus(&mut self, _forward: bool) -> Result<(), FocusError> {
        Err(FocusError::Unsupported)
    }

    /// Switch display mode, returning the new one when supported
    fn toggle_display_mode(&mut self) -> Option<DisplayMode> {
        None
    }

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get as any mut for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
