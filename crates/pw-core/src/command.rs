//! Messages delivered to the coordinator

use egui::Pos2;

use crate::record::RecordSet;
use crate::view::ViewId;

/// Pointer gesture in plot-area pixel coordinates, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start(Pos2),
    Move(Pos2),
    End(Pos2),
    Cancel,
}

impl GestureEvent {
    /// Whether the gesture is over after this event
    pub fn is_terminal(&self) -> bool {
        matches!(self, GestureEvent::End(_) | GestureEvent::Cancel)
    }
}

/// Intake message for [`crate::SelectionCoordinator::dispatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A view finished a gesture; an empty set releases the brush
    CandidateSelection { origin: ViewId, records: RecordSet },

    /// Explicit reset from a control outside any view
    ClearSelection,

    ToggleDisplayMode { view: ViewId },

    SetDrillFocus { view: ViewId, value: String },

    StepDrillFocus { view: ViewId, forward: bool },
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::CandidateSelection { .. } => "candidate_selection",
            Command::ClearSelection => "clear_selection",
            Command::ToggleDisplayMode { .. } => "toggle_display_mode",
            Command::SetDrillFocus { .. } => "set_drill_focus",
            Command::StepDrillFocus { .. } => "step_drill_focus",
        }
    }
}
