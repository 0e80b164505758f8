//! Tyre strategy strip: one cell per driver and lap, coloured by compound

use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

use egui::{pos2, Color32, Rect, Stroke};
use pw_core::{Command, FieldId, GestureEvent, RecordSet, RecordStore, TagId, ViewAdapter, ViewId};
use tracing::warn;

use super::utils::strip_compound_color;
use crate::brush::BrushAxes;
use crate::frame::{GestureOutcome, ViewFrame};
use crate::scale::BandScale;
use crate::scene::{EmphasisPalette, Look, MarkShape, MountPoint, Overlay};

const LAP_PADDING: f32 = 0.02;
const DRIVER_PADDING: f32 = 0.1;
const MAX_LAP_COLUMNS: usize = 1000;

const PALETTE: EmphasisPalette = EmphasisPalette {
    baseline: Look::new(0.8, 0.0),
    selected: Look::new(1.0, 0.0).stroked(Stroke {
        width: 1.0,
        color: Color32::BLACK,
    }),
    context: Look::new(0.5, 0.0),
    dimmed: Look::new(0.1, 0.0),
};

/// Driver rows against lap columns; brushing selects whole lap ranges
pub struct StrategyStripView {
    frame: ViewFrame,
    laps: BandScale<i64>,
    drivers: BandScale<String>,
}

impl StrategyStripView {
    pub fn new(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>) -> Self {
        Self {
            frame: ViewFrame::new(title, mount, store, BrushAxes::X),
            laps: BandScale::new(Vec::new(), (0.0, 0.0), LAP_PADDING),
            drivers: BandScale::new(Vec::new(), (0.0, 0.0), DRIVER_PADDING),
        }
    }

    pub fn frame(&self) -> &ViewFrame {
        &self.frame
    }

    /// Driver rows, top to bottom
    pub fn drivers(&self) -> &[String] {
        self.drivers.domain()
    }

    fn cell(&self, lap: i64, driver: &String) -> Option<Rect> {
        let x = self.laps.position(&lap)?;
        let y = self.drivers.position(driver)?;
        Some(Rect::from_min_size(
            pos2(x, y),
            egui::vec2(self.laps.bandwidth(), self.drivers.bandwidth()),
        ))
    }
}

fn lap_key(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}

/// Every lap between first and last gets a column, even without data.
/// Spans wider than `MAX_LAP_COLUMNS` fall back to the laps present.
fn lap_columns(laps: impl Iterator<Item = i64>) -> Vec<i64> {
    let present: BTreeSet<i64> = laps.collect();
    let (Some(&lo), Some(&hi)) = (present.first(), present.last()) else {
        return Vec::new();
    };
    if (hi as i128 - lo as i128) < MAX_LAP_COLUMNS as i128 {
        (lo..=hi).collect()
    } else {
        warn!(first = lo, last = hi, "Lap span too wide, showing recorded laps only");
        present.into_iter().collect()
    }
}

impl ViewAdapter for StrategyStripView {
    fn id(&self) -> ViewId {
        self.frame.id
    }

    fn display_name(&self) -> &str {
        &self.frame.title
    }

    fn view_type(&self) -> &str {
        "StrategyStripView"
    }

    fn render(&mut self, records: &RecordSet) {
        self.frame.scene.clear();
        self.frame.rendered = records.clone();

        let area = self.frame.plot_area();
        let store = self.frame.store.clone();

        let laps = lap_columns(store.resolve(records).filter_map(|r| lap_key(r.value(FieldId::LapNumber))));
        self.laps = BandScale::new(laps, (0.0, area.width()), LAP_PADDING);
        self.drivers = BandScale::new(
            store.distinct_tags(records, TagId::Driver),
            (0.0, area.height()),
            DRIVER_PADDING,
        );

        for driver in self.drivers.domain() {
            if let Some(center) = self.drivers.center(driver) {
                self.frame.scene.push_overlay(Overlay::AxisTick {
                    at: pos2(0.0, center),
                    label: driver.clone(),
                });
            }
        }

        for record in store.resolve(records) {
            let Some(lap) = lap_key(record.value(FieldId::LapNumber)) else {
                continue;
            };
            let Some(rect) = self.cell(lap, &record.tag(TagId::Driver).to_string()) else {
                continue;
            };
            let color = strip_compound_color(record.tag(TagId::Compound));
            self.frame
                .scene
                .push_mark(record.index(), MarkShape::Cell { rect }, color, &PALETTE);
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
            GestureOutcome::Region(region) => self.frame.scene.hits(|mark| match mark.shape {
                MarkShape::Cell { rect } => {
                    let x = rect.center().x;
                    x >= region.min.x && x <= region.max.x
                }
                _ => false,
            }),
            // A click picks the single cell under the pointer
            GestureOutcome::Click(pos) => self.frame.scene.hits(|mark| match mark.shape {
                MarkShape::Cell { rect } => rect.contains(pos),
                _ => false,
            }),
            GestureOutcome::Release => RecordSet::new(),
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
