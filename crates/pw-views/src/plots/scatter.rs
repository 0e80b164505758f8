//! Point cloud over two numeric fields

use std::any::Any;
use std::sync::Arc;

use egui::{Color32, Stroke};
use pw_core::{Command, FieldId, GestureEvent, RecordSet, RecordStore, TagId, ViewAdapter, ViewId};
use tracing::debug;

use super::utils::{categorical_color, compound_color, COMPOUNDS};
use crate::brush::BrushAxes;
use crate::frame::{GestureOutcome, ViewFrame};
use crate::scale::LinearScale;
use crate::scene::{EmphasisPalette, Look, MarkShape, MountPoint};

/// How points are coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBy {
    Compound,
    Cluster,
}

/// Configuration for a point cloud
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudConfig {
    /// X-axis field
    pub x: FieldId,

    /// Y-axis field
    pub y: FieldId,

    pub color_by: ColorBy,

    /// Base point radius
    pub radius: f32,
}

impl PointCloudConfig {
    /// Laps projected on the first two principal components
    pub fn pca() -> Self {
        Self {
            x: FieldId::PcaX,
            y: FieldId::PcaY,
            color_by: ColorBy::Compound,
            radius: 5.0,
        }
    }

    /// Lap time against tyre age
    pub fn tyre_degradation() -> Self {
        Self {
            x: FieldId::TyreLife,
            y: FieldId::LapTime,
            color_by: ColorBy::Compound,
            radius: 4.0,
        }
    }
}

impl Default for PointCloudConfig {
    fn default() -> Self {
        Self::pca()
    }
}

/// Scatter view with a two-dimensional brush
pub struct PointCloudView {
    frame: ViewFrame,
    pub config: PointCloudConfig,
    palette: EmphasisPalette,
}

impl PointCloudView {
    pub fn new(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>, config: PointCloudConfig) -> Self {
        let palette = EmphasisPalette {
            baseline: Look::new(0.8, config.radius).stroked(Stroke::new(0.5, Color32::BLACK)),
            selected: Look::new(1.0, config.radius).stroked(Stroke::new(1.0, Color32::BLACK)),
            context: Look::new(0.4, config.radius),
            dimmed: Look::new(0.05, config.radius),
        };
        Self {
            frame: ViewFrame::new(title, mount, store, BrushAxes::XY),
            config,
            palette,
        }
    }

    pub fn frame(&self) -> &ViewFrame {
        &self.frame
    }

    /// Compound legend entries
    pub fn legend(&self) -> Vec<(&'static str, Color32)> {
        COMPOUNDS.iter().map(|c| (*c, compound_color(c))).collect()
    }

    fn color_of(&self, compound: &str, cluster: f64) -> Color32 {
        match self.config.color_by {
            ColorBy::Compound => compound_color(compound),
            ColorBy::Cluster if cluster.is_finite() && cluster >= 0.0 => categorical_color(cluster as usize),
            ColorBy::Cluster => Color32::from_gray(0x88),
        }
    }

    fn apply_highlight(&mut self) {
        self.frame.restyle(&self.palette);
    }
}

impl ViewAdapter for PointCloudView {
    fn id(&self) -> ViewId {
        self.frame.id
    }

    fn display_name(&self) -> &str {
        &self.frame.title
    }

    fn view_type(&self) -> &str {
        "PointCloudView"
    }

    fn render(&mut self, records: &RecordSet) {
        self.frame.scene.clear();
        self.frame.rendered = records.clone();

        let store = self.frame.store.clone();
        let area = self.frame.plot_area();
        let (x, y) = (self.config.x, self.config.y);
        let points: Vec<_> = store
            .resolve(records)
            .filter(|r| r.value(x).is_finite() && r.value(y).is_finite())
            .collect();

        let Some(x_scale) = LinearScale::from_values(points.iter().map(|r| r.value(x)), (0.0, area.width())) else {
            debug!(view = %self.frame.title, "Nothing to plot");
            return;
        };
        let Some(y_scale) = LinearScale::from_values(points.iter().map(|r| r.value(y)), (area.height(), 0.0)) else {
            return;
        };

        for record in points {
            let center = egui::pos2(x_scale.scale(record.value(x)), y_scale.scale(record.value(y)));
            let color = self.color_of(record.tag(TagId::Compound), record.value(FieldId::Cluster));
            self.frame
                .scene
                .push_mark(record.index(), MarkShape::Dot { center }, color, &self.palette);
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
    use egui::pos2;
    use pw_core::{Record, RecordIdx};

    fn store() -> Arc<RecordStore> {
        // Plot area is 100x100 after margins
        let laps = [(0.0, 0.0, "SOFT"), (10.0, 10.0, "HARD"), (7.0, 7.0, "MEDIUM")];
        Arc::new(RecordStore::from_records(
            laps.iter()
                .map(|&(x, y, compound)| {
                    Record::empty()
                        .with_value(FieldId::PcaX, x)
                        .with_value(FieldId::PcaY, y)
                        .with_tag(TagId::Compound, compound)
                })
                .chain(std::iter::once(Record::empty().with_tag(TagId::Compound, "WET")))
                .collect(),
        ))
    }

    fn view(store: &Arc<RecordStore>) -> PointCloudView {
        let mount = MountPoint::new("cloud", 180.0, 170.0);
        let mut view = PointCloudView::new("PCA", mount, store.clone(), PointCloudConfig::pca());
        view.render(&store.all());
        view
    }

    #[test]
    fn test_render_maps_extent_to_plot_area() {
        let store = store();
        let view = view(&store);
        let scene = &view.frame().scene;

        // Record without coordinates is skipped
        assert_eq!(scene.marks().len(), 3);
        assert_eq!(
            scene.mark(RecordIdx(0)).unwrap().shape,
            MarkShape::Dot { center: pos2(0.0, 100.0) }
        );
        assert_eq!(
            scene.mark(RecordIdx(1)).unwrap().shape,
            MarkShape::Dot { center: pos2(100.0, 0.0) }
        );
        assert_eq!(scene.mark(RecordIdx(1)).unwrap().color, compound_color("HARD"));
    }

    #[test]
    fn test_moves_only_preview() {
        let store = store();
        let mut view = view(&store);
        assert_eq!(view.on_gesture(&GestureEvent::Start(pos2(40.0, 40.0))), None);
        assert_eq!(view.on_gesture(&GestureEvent::Move(pos2(60.0, 60.0))), None);
        assert!(view.frame().scene.brush().is_some());
        assert_eq!(view.frame().scene.count(Emphasis::Baseline), 3);
    }

    #[test]
    fn test_brush_reports_contained_points() {
        let store = store();
        let mut view = view(&store);
        view.on_gesture(&GestureEvent::Start(pos2(40.0, 40.0)));
        let command = view.on_gesture(&GestureEvent::End(pos2(110.0, -5.0)));

        let expected: RecordSet = [RecordIdx(1), RecordIdx(2)].into_iter().collect();
        assert_eq!(
            command,
            Some(Command::CandidateSelection { origin: view.id(), records: expected })
        );
        assert_eq!(view.frame().scene.count(Emphasis::Selected), 2);
        assert_eq!(view.frame().scene.count(Emphasis::Dimmed), 1);
    }

    #[test]
    fn test_click_reports_empty_candidate() {
        let store = store();
        let mut view = view(&store);
        view.on_gesture(&GestureEvent::Start(pos2(40.0, 40.0)));
        let command = view.on_gesture(&GestureEvent::End(pos2(41.0, 40.0)));
        assert_eq!(
            command,
            Some(Command::CandidateSelection { origin: view.id(), records: RecordSet::new() })
        );
        assert_eq!(view.frame().scene.count(Emphasis::Baseline), 3);
    }

    #[test]
    fn test_full_highlight_is_uniform() {
        let store = store();
        let mut view = view(&store);
        view.set_highlight(&[RecordIdx(0)].into_iter().collect());
        assert_eq!(view.frame().scene.count(Emphasis::Selected), 1);

        view.set_highlight(&store.all());
        assert_eq!(view.frame().scene.count(Emphasis::Baseline), 3);
    }

    #[test]
    fn test_cluster_coloring() {
        let store = Arc::new(RecordStore::from_records(vec![
            Record::empty()
                .with_value(FieldId::TyreLife, 1.0)
                .with_value(FieldId::LapTime, 90.0)
                .with_value(FieldId::Cluster, 2.0),
        ]));
        let mut config = PointCloudConfig::tyre_degradation();
        config.color_by = ColorBy::Cluster;
        let mut view = PointCloudView::new("Degradation", MountPoint::new("deg", 200.0, 200.0), store.clone(), config);
        view.render(&store.all());
        assert_eq!(view.frame().scene.mark(RecordIdx(0)).unwrap().color, categorical_color(2));
    }
}
