//! Linked views for the lap analysis dashboard
//!
//! Every view keeps a retained [`Scene`] of marks bound to record indices.
//! Gestures are tracked by a [`BrushTracker`]; a view only ever proposes a
//! selection through the [`pw_core::Command`] returned when a gesture ends.

mod brush;
mod frame;
pub mod plots;
mod scale;
mod scene;

pub use brush::{BrushAxes, BrushTracker, BrushUpdate, CLICK_TOLERANCE};
pub use frame::{GestureOutcome, ViewFrame};
pub use plots::{
    ColorBy, DistributionView, LapTimeView, ParallelCoordinatesView, PointCloudConfig, PointCloudView,
    StrategyStripView,
};
pub use scale::{extent, point_positions, BandScale, LinearScale};
pub use scene::{
    BoxGlyph, Emphasis, EmphasisPalette, Look, Margin, Mark, MarkShape, MarkStyle, MountPoint, Overlay, Scene,
};
