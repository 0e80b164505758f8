//! Distribution of one field as a Tukey box with the laps scattered over it

use std::any::Any;
use std::sync::Arc;

use egui::{pos2, Color32};
use pw_core::analytics::summarize;
use pw_core::{Command, FieldId, GestureEvent, RecordIdx, RecordSet, RecordStore, ViewAdapter, ViewId};
use tracing::debug;

use super::utils::ACCENT;
use crate::brush::BrushAxes;
use crate::frame::{GestureOutcome, ViewFrame};
use crate::scale::{extent, LinearScale};
use crate::scene::{BoxGlyph, EmphasisPalette, Look, MarkShape, MountPoint, Overlay};

/// Fill of the box over every rendered lap
pub const BOX_GRAY: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);

const MAX_BOX_WIDTH: f32 = 60.0;
const DOMAIN_PADDING: f64 = 0.5;

const PALETTE: EmphasisPalette = EmphasisPalette {
    baseline: Look::new(0.5, 3.0),
    selected: Look::new(0.9, 3.5).colored(ACCENT),
    context: Look::new(0.4, 3.0).colored(ACCENT),
    dimmed: Look::new(0.1, 2.0),
};

/// Box plot of a single field with a vertical brush
pub struct DistributionView {
    frame: ViewFrame,
    field: FieldId,
    y_scale: Option<LinearScale>,
}

impl DistributionView {
    pub fn new(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>) -> Self {
        Self::for_field(title, mount, store, FieldId::LapTime)
    }

    pub fn for_field(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>, field: FieldId) -> Self {
        Self {
            frame: ViewFrame::new(title, mount, store, BrushAxes::Y),
            field,
            y_scale: None,
        }
    }

    pub fn frame(&self) -> &ViewFrame {
        &self.frame
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Boxes currently drawn, overall first
    pub fn boxes(&self) -> Vec<BoxGlyph> {
        self.frame
            .scene
            .overlays()
            .iter()
            .filter_map(|o| match o {
                Overlay::Box(glyph) => Some(*glyph),
                _ => None,
            })
            .collect()
    }

    fn box_width(&self) -> f32 {
        MAX_BOX_WIDTH.min(self.frame.plot_area().width() * 0.5)
    }

    fn glyph(&self, records: &RecordSet, width: f32, fill: Color32) -> Option<BoxGlyph> {
        let y = self.y_scale?;
        let aggregate = summarize(&self.frame.store, records, self.field);
        let s = aggregate.snapshot()?;
        Some(BoxGlyph {
            center_x: self.frame.plot_area().center().x,
            width,
            whisker_low: y.scale(s.whisker_low),
            q1: y.scale(s.q1),
            median: y.scale(s.median),
            q3: y.scale(s.q3),
            whisker_high: y.scale(s.whisker_high),
            fill,
        })
    }

    fn apply_highlight(&mut self) {
        self.frame.restyle(&PALETTE);
        self.frame.scene.remove_overlays(|o| matches!(o, Overlay::Box(_)));

        let width = self.box_width();
        let rendered = self.frame.rendered.clone();
        if let Some(glyph) = self.glyph(&rendered, width, BOX_GRAY) {
            self.frame.scene.push_overlay(Overlay::Box(glyph));
        }
        if self.frame.highlight_is_full() {
            return;
        }
        let selected = self.frame.highlight.intersection(&rendered);
        if let Some(glyph) = self.glyph(&selected, width * 0.6, ACCENT) {
            self.frame.scene.push_overlay(Overlay::Box(glyph));
        }
    }
}

/// Horizontal offset in [-0.5, 0.5) that is stable per record
fn jitter(record: RecordIdx) -> f32 {
    (record.0.wrapping_mul(7919) % 101) as f32 / 101.0 - 0.5
}

impl ViewAdapter for DistributionView {
    fn id(&self) -> ViewId {
        self.frame.id
    }

    fn display_name(&self) -> &str {
        &self.frame.title
    }

    fn view_type(&self) -> &str {
        "DistributionView"
    }

    fn render(&mut self, records: &RecordSet) {
        self.frame.scene.clear();
        self.frame.rendered = records.clone();

        let area = self.frame.plot_area();
        let store = self.frame.store.clone();
        let field = self.field;
        self.y_scale = extent(store.resolve(records).map(|r| r.value(field)))
            .map(|(lo, hi)| LinearScale::new((lo - DOMAIN_PADDING, hi + DOMAIN_PADDING), (area.height(), 0.0)));
        let Some(y_scale) = self.y_scale else {
            debug!(view = %self.frame.title, %field, "Nothing to plot");
            return;
        };

        for tick in y_scale.ticks(5) {
            self.frame.scene.push_overlay(Overlay::AxisTick {
                at: pos2(0.0, y_scale.scale(tick)),
                label: format!("{tick:.1}"),
            });
        }

        let spread = self.box_width();
        let center_x = area.center().x;
        for record in store.resolve(records) {
            let value = record.value(field);
            if value.is_nan() {
                continue;
            }
            let center = pos2(center_x + jitter(record.index()) * spread, y_scale.scale(value));
            self.frame
                .scene
                .push_mark(record.index(), MarkShape::Dot { center }, BOX_GRAY, &PALETTE);
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
            GestureOutcome::Region(band) => self.frame.scene.hits(|mark| match mark.shape {
                MarkShape::Dot { center } => center.y >= band.min.y && center.y <= band.max.y,
                _ => false,
            }),
            GestureOutcome::Click(_) | GestureOutcome::Release => RecordSet::new(),
        };

        self.frame.highlight = self.frame.local_selection(&proposal);
        self.apply_highlight();
        Some(self.frame.propose(proposal))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Emphasis;
    use pw_core::Record;

    fn view() -> (DistributionView, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::from_records(
            [90.0, 91.0, 92.0, 93.0, 94.0, f64::NAN]
                .iter()
                .map(|&t| Record::empty().with_value(FieldId::LapTime, t))
                .collect(),
        ));
        // 100 x 100 plot area, y domain 89.5..94.5
        let mount = MountPoint::new("dist", 180.0, 170.0);
        let mut view = DistributionView::new("Lap time spread", mount, store.clone());
        view.render(&store.all());
        (view, store)
    }

    #[test]
    fn test_box_over_rendered_laps() {
        let (view, _) = view();
        assert_eq!(view.frame().scene.marks().len(), 5);

        let boxes = view.boxes();
        assert_eq!(boxes.len(), 1);
        let glyph = boxes[0];
        assert_eq!(glyph.width, 50.0);
        assert_eq!(glyph.center_x, 50.0);
        assert!((glyph.median - 50.0).abs() < 1e-3);
        assert!((glyph.q1 - 70.0).abs() < 1e-3);
        assert!((glyph.whisker_low - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_dots_stay_within_box_spread() {
        let (view, _) = view();
        for mark in view.frame().scene.marks() {
            let MarkShape::Dot { center } = mark.shape else {
                panic!("expected a dot");
            };
            assert!((center.x - 50.0).abs() <= 25.0);
        }
    }

    #[test]
    fn test_vertical_band_selects_values() {
        let (mut view, _) = view();
        // 92.5..94.5 in pixels
        view.on_gesture(&GestureEvent::Start(pos2(10.0, 0.0)));
        let command = view.on_gesture(&GestureEvent::End(pos2(12.0, 40.0)));
        let Some(Command::CandidateSelection { records, .. }) = command else {
            panic!("expected a candidate");
        };
        assert_eq!(records.iter().collect::<Vec<_>>(), vec![RecordIdx(3), RecordIdx(4)]);
        assert_eq!(view.frame().scene.count(Emphasis::Selected), 2);

        let boxes = view.boxes();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[1].fill, ACCENT);
        assert!((boxes[1].median - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_clearing_highlight_drops_second_box() {
        let (mut view, store) = view();
        view.set_highlight(&[RecordIdx(0)].into_iter().collect());
        assert_eq!(view.boxes().len(), 2);
        view.set_highlight(&store.all());
        assert_eq!(view.boxes().len(), 1);
    }

    #[test]
    fn test_empty_render_draws_nothing() {
        let (mut view, _) = view();
        view.render(&RecordSet::new());
        assert!(view.frame().scene.marks().is_empty());
        assert!(view.boxes().is_empty());
    }
}
