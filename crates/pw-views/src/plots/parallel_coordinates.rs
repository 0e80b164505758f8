//! Parallel coordinates over the sector deltas and lap time

use std::any::Any;
use std::sync::Arc;

use egui::pos2;
use pw_core::{Command, FieldId, GestureEvent, RecordSet, RecordStore, ViewAdapter, ViewId};

use super::utils::{AXIS_BLUE, BRUSH_RED, MUTED_GRAY};
use crate::brush::BrushAxes;
use crate::frame::{GestureOutcome, ViewFrame};
use crate::scale::{point_positions, LinearScale};
use crate::scene::{EmphasisPalette, Look, MarkShape, MountPoint, Overlay};

/// Default axis order
pub const DEFAULT_AXES: [FieldId; 4] = [FieldId::S1Delta, FieldId::S2Delta, FieldId::S3Delta, FieldId::LapTime];

const PALETTE: EmphasisPalette = EmphasisPalette {
    baseline: Look::new(0.4, 1.5),
    selected: Look::new(0.8, 2.5).colored(BRUSH_RED),
    context: Look::new(0.3, 1.5).colored(BRUSH_RED),
    dimmed: Look::new(0.03, 1.0).colored(MUTED_GRAY),
};

struct Axis {
    field: FieldId,
    x: f32,
    scale: LinearScale,
}

/// One polyline per lap across a set of numeric axes
pub struct ParallelCoordinatesView {
    frame: ViewFrame,
    fields: Vec<FieldId>,
    axes: Vec<Axis>,
}

impl ParallelCoordinatesView {
    pub fn new(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>) -> Self {
        Self::with_axes(title, mount, store, DEFAULT_AXES.to_vec())
    }

    pub fn with_axes(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>, fields: Vec<FieldId>) -> Self {
        Self {
            frame: ViewFrame::new(title, mount, store, BrushAxes::XY),
            fields,
            axes: Vec::new(),
        }
    }

    pub fn frame(&self) -> &ViewFrame {
        &self.frame
    }

    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    /// Horizontal position of an axis after the last render
    pub fn axis_x(&self, field: FieldId) -> Option<f32> {
        self.axes.iter().find(|a| a.field == field).map(|a| a.x)
    }

    fn layout_axes(&mut self, records: &RecordSet) {
        let area = self.frame.plot_area();
        let store = self.frame.store.clone();
        let xs = point_positions(self.fields.len(), (0.0, area.width()));

        self.axes = self
            .fields
            .iter()
            .zip(xs)
            .filter_map(|(&field, x)| {
                let values = store.resolve(records).map(|r| r.value(field));
                let scale = LinearScale::from_values(values, (area.height(), 0.0))?;
                Some(Axis { field, x, scale })
            })
            .collect();

        for axis in &self.axes {
            self.frame.scene.push_overlay(Overlay::AxisTick {
                at: pos2(axis.x, area.height()),
                label: axis.field.label().to_string(),
            });
        }
    }
}

impl ViewAdapter for ParallelCoordinatesView {
    fn id(&self) -> ViewId {
        self.frame.id
    }

    fn display_name(&self) -> &str {
        &self.frame.title
    }

    fn view_type(&self) -> &str {
        "ParallelCoordinatesView"
    }

    fn render(&mut self, records: &RecordSet) {
        self.frame.scene.clear();
        self.frame.rendered = records.clone();
        self.layout_axes(records);

        let store = self.frame.store.clone();
        for record in store.resolve(records) {
            // Axes with a missing value are skipped, not drawn at zero
            let points: Vec<_> = self
                .axes
                .iter()
                .filter(|axis| record.value(axis.field).is_finite())
                .map(|axis| pos2(axis.x, axis.scale.scale(record.value(axis.field))))
                .collect();
            if points.len() < 2 {
                continue;
            }
            self.frame
                .scene
                .push_mark(record.index(), MarkShape::Polyline { points }, AXIS_BLUE, &PALETTE);
        }
        self.frame.restyle(&PALETTE);
    }

    fn set_highlight(&mut self, selection: &RecordSet) {
        self.frame.highlight = selection.clone();
        self.frame.restyle(&PALETTE);
    }

    fn on_gesture(&mut self, gesture: &GestureEvent) -> Option<Command> {
        let proposal = match self.frame.track(gesture) {
            GestureOutcome::Pending => return None,
            GestureOutcome::Region(region) => self.frame.scene.hits(|mark| match &mark.shape {
                MarkShape::Polyline { points } => points.iter().any(|p| region.contains(*p)),
                _ => false,
            }),
            GestureOutcome::Click(_) | GestureOutcome::Release => RecordSet::new(),
        };

        self.frame.highlight = self.frame.local_selection(&proposal);
        self.frame.restyle(&PALETTE);
        Some(self.frame.propose(proposal))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
