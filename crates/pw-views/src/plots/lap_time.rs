//! Lap-by-lap time series with a rank mode and a per-driver drill focus

use std::any::Any;
use std::sync::Arc;

use egui::pos2;
use pw_core::analytics::fit;
use pw_core::{
    Command, DisplayMode, DrillFocus, FieldId, FocusError, GestureEvent, RecordSet, RecordStore, TagId,
    ViewAdapter, ViewId,
};
use tracing::debug;

use super::utils::{ACCENT, LAP_GREEN};
use crate::brush::BrushAxes;
use crate::frame::{GestureOutcome, ViewFrame};
use crate::scale::{extent, LinearScale};
use crate::scene::{Emphasis, EmphasisPalette, Look, MarkShape, MountPoint, Overlay};

const PALETTE: EmphasisPalette = EmphasisPalette {
    baseline: Look::new(0.6, 4.0),
    selected: Look::new(1.0, 5.0).colored(ACCENT),
    context: Look::new(0.35, 3.0).colored(ACCENT),
    dimmed: Look::new(0.05, 2.0),
};

/// Lap number against lap time, or against race position in rank mode
pub struct LapTimeView {
    frame: ViewFrame,
    mode: DisplayMode,
    focus: DrillFocus,
    x_scale: Option<LinearScale>,
    y_scale: Option<LinearScale>,
}

impl LapTimeView {
    pub fn new(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>) -> Self {
        Self {
            frame: ViewFrame::new(title, mount, store, BrushAxes::XY),
            mode: DisplayMode::default(),
            focus: DrillFocus::new(TagId::Driver),
            x_scale: None,
            y_scale: None,
        }
    }

    pub fn frame(&self) -> &ViewFrame {
        &self.frame
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    fn y_field(&self) -> FieldId {
        match self.mode {
            DisplayMode::Continuous => FieldId::LapTime,
            DisplayMode::Rank => FieldId::Position,
        }
    }

    fn layout(&mut self, records: &RecordSet) {
        let area = self.frame.plot_area();
        let store = self.frame.store.clone();
        let y_field = self.y_field();

        self.x_scale = LinearScale::from_values(
            store.resolve(records).map(|r| r.value(FieldId::LapNumber)),
            (0.0, area.width()),
        );
        self.y_scale = match self.mode {
            DisplayMode::Continuous => {
                LinearScale::from_values(store.resolve(records).map(|r| r.value(y_field)), (area.height(), 0.0))
            }
            // P1 on top
            DisplayMode::Rank => extent(store.resolve(records).map(|r| r.value(y_field)))
                .map(|(_, worst)| LinearScale::new((1.0, worst.max(1.0)), (0.0, area.height()))),
        };

        let Some(y_scale) = self.y_scale else {
            return;
        };
        let ticks = match self.mode {
            DisplayMode::Continuous => y_scale
                .ticks(5)
                .into_iter()
                .map(|t| (t, format!("{t:.1}s")))
                .collect::<Vec<_>>(),
            DisplayMode::Rank => {
                let (best, worst) = y_scale.domain();
                (best.ceil() as i64..=worst.floor() as i64)
                    .map(|p| (p as f64, format!("P{p}")))
                    .collect()
            }
        };
        for (value, label) in ticks {
            self.frame.scene.push_overlay(Overlay::AxisTick {
                at: pos2(0.0, y_scale.scale(value)),
                label,
            });
        }
    }

    fn apply_highlight(&mut self) {
        let full = self.frame.highlight_is_full();
        let highlight = &self.frame.highlight;
        let store = &self.frame.store;
        let focus = &self.focus;

        self.frame.scene.restyle(&PALETTE, |idx| {
            if !full && !highlight.contains(idx) {
                return Emphasis::Dimmed;
            }
            match focus.focus() {
                Some(_) if store.get(idx).is_some_and(|r| focus.is_focused(r.tag(TagId::Driver))) => {
                    Emphasis::Selected
                }
                Some(_) => Emphasis::Context,
                None if full => Emphasis::Baseline,
                None => Emphasis::Selected,
            }
        });
        self.draw_trend();
    }

    /// Dashed degradation line over the highlighted laps
    fn draw_trend(&mut self) {
        self.frame
            .scene
            .remove_overlays(|o| matches!(o, Overlay::TrendLine { .. }));
        if self.mode != DisplayMode::Continuous || self.frame.highlight_is_full() {
            return;
        }
        let (Some(x_scale), Some(y_scale)) = (self.x_scale, self.y_scale) else {
            return;
        };

        let store = self.frame.store.clone();
        let selected = self.frame.highlight.intersection(&self.frame.rendered);
        let model = match fit(&store, &selected, FieldId::TyreLife, FieldId::LapTime) {
            Ok(model) => model,
            Err(reason) => {
                debug!(view = %self.frame.title, ?reason, "No degradation line");
                return;
            }
        };

        let laps = extent(store.resolve(&selected).map(|r| r.value(FieldId::LapNumber)));
        let life = extent(store.resolve(&selected).map(|r| r.value(FieldId::TyreLife)));
        let (Some((first_lap, last_lap)), Some((fresh, worn))) = (laps, life) else {
            return;
        };

        self.frame.scene.push_overlay(Overlay::TrendLine {
            from: pos2(x_scale.scale(first_lap), y_scale.scale(model.predict(fresh))),
            to: pos2(x_scale.scale(last_lap), y_scale.scale(model.predict(worn))),
            color: ACCENT,
            dashed: true,
        });
    }
}

impl ViewAdapter for LapTimeView {
    fn id(&self) -> ViewId {
        self.frame.id
    }

    fn display_name(&self) -> &str {
        &self.frame.title
    }

    fn view_type(&self) -> &str {
        "LapTimeView"
    }

    fn render(&mut self, records: &RecordSet) {
        self.frame.scene.clear();
        self.frame.rendered = records.clone();
        self.layout(records);

        let (Some(x_scale), Some(y_scale)) = (self.x_scale, self.y_scale) else {
            debug!(view = %self.frame.title, "Nothing to plot");
            return;
        };
        let store = self.frame.store.clone();
        let y_field = self.y_field();
        for record in store.resolve(records) {
            let (lap, y) = (record.value(FieldId::LapNumber), record.value(y_field));
            if !lap.is_finite() || !y.is_finite() {
                continue;
            }
            let center = pos2(x_scale.scale(lap), y_scale.scale(y));
            self.frame
                .scene
                .push_mark(record.index(), MarkShape::Dot { center }, LAP_GREEN, &PALETTE);
        }
        self.apply_highlight();
    }

    fn set_highlight(&mut self, selection: &RecordSet) {
        self.frame.highlight = selection.clone();
        self.apply_highlight();
    }

    fn on_gesture(&mut self, gesture: &GestureEvent) -> Option<Command> {
        let proposal = match self.frame.track(gesture) {
            GestureOutcome::Pending => return None,
            GestureOutcome::Region(region) => self.frame.scene.hits(|mark| match mark.shape {
                MarkShape::Dot { center } => region.contains(center),
                _ => false,
            }),
            GestureOutcome::Click(_) | GestureOutcome::Release => RecordSet::new(),
        };

        self.frame.highlight = self.frame.local_selection(&proposal);
        self.apply_highlight();
        Some(self.frame.propose(proposal))
    }

    fn drill_focus(&self) -> Option<&DrillFocus> {
        Some(&self.focus)
    }

    fn narrow(&mut self, selection: &RecordSet) {
        self.focus.narrow(&self.frame.store, selection);
        self.apply_highlight();
    }

    fn focus_on(&mut self, value: &str) -> Result<(), FocusError> {
        self.focus.select(value)?;
        self.apply_highlight();
        Ok(())
    }

    fn step_focus(&mut self, forward: bool) -> Result<(), FocusError> {
        if forward {
            self.focus.next()?;
        } else {
            self.focus.previous()?;
        }
        self.apply_highlight();
        Ok(())
    }

    fn toggle_display_mode(&mut self) -> Option<DisplayMode> {
        self.mode = self.mode.toggled();
        let rendered = self.frame.rendered.clone();
        self.render(&rendered);
        Some(self.mode)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
