//! Retained scene model each view draws into

use egui::{vec2, Color32, Pos2, Rect, Stroke, Vec2};
use pw_core::{RecordIdx, RecordSet};
use serde::{Deserialize, Serialize};

/// Space reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(30.0, 30.0, 40.0, 50.0)
    }
}

/// Caller-provided container a view renders into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountPoint {
    pub name: String,
    pub size: Vec2,
    #[serde(default)]
    pub margin: Margin,
}

impl MountPoint {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            size: vec2(width, height),
            margin: Margin::default(),
        }
    }

    /// Drawable area in plot-local pixels, origin at its top-left corner
    pub fn plot_area(&self) -> Rect {
        let width = (self.size.x - self.margin.left - self.margin.right).max(1.0);
        let height = (self.size.y - self.margin.top - self.margin.bottom).max(1.0);
        Rect::from_min_size(Pos2::ZERO, vec2(width, height))
    }
}

/// How prominently a mark is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// No active brush
    Baseline,
    Selected,
    /// Selected but outside the drill focus
    Context,
    Dimmed,
}

/// Resolved visual attributes of a mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkStyle {
    pub fill: Color32,
    pub stroke: Stroke,
    pub opacity: f32,
    /// Radius for dots, line width for polylines
    pub size: f32,
}

/// Per-emphasis look; `color: None` keeps the mark's own colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub color: Option<Color32>,
    pub stroke: Stroke,
    pub opacity: f32,
    pub size: f32,
}

impl Look {
    pub const fn new(opacity: f32, size: f32) -> Self {
        Self {
            color: None,
            stroke: Stroke::NONE,
            opacity,
            size,
        }
    }

    pub const fn colored(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }

    pub const fn stroked(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }
}

/// Looks for every emphasis level of one view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmphasisPalette {
    pub baseline: Look,
    pub selected: Look,
    pub context: Look,
    pub dimmed: Look,
}

impl EmphasisPalette {
    pub fn look(&self, emphasis: Emphasis) -> &Look {
        match emphasis {
            Emphasis::Baseline => &self.baseline,
            Emphasis::Selected => &self.selected,
            Emphasis::Context => &self.context,
            Emphasis::Dimmed => &self.dimmed,
        }
    }

    pub fn style(&self, emphasis: Emphasis, color: Color32) -> MarkStyle {
        let look = self.look(emphasis);
        MarkStyle {
            fill: look.color.unwrap_or(color),
            stroke: look.stroke,
            opacity: look.opacity,
            size: look.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkShape {
    Dot { center: Pos2 },
    Polyline { points: Vec<Pos2> },
    Cell { rect: Rect },
}

impl MarkShape {
    /// Reference point used for hit testing and labels
    pub fn anchor(&self) -> Option<Pos2> {
        match self {
            MarkShape::Dot { center } => Some(*center),
            MarkShape::Polyline { points } => points.first().copied(),
            MarkShape::Cell { rect } => Some(rect.center()),
        }
    }
}

/// One drawn element bound to one record
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub record: RecordIdx,
    pub shape: MarkShape,
    /// Encoded colour before emphasis
    pub color: Color32,
    pub emphasis: Emphasis,
    pub style: MarkStyle,
}

/// Tukey box in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGlyph {
    pub center_x: f32,
    pub width: f32,
    pub whisker_low: f32,
    pub q1: f32,
    pub median: f32,
    pub q3: f32,
    pub whisker_high: f32,
    pub fill: Color32,
}

/// Non-record decoration
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Region of an in-progress or completed brush
    Brush(Rect),
    TrendLine {
        from: Pos2,
        to: Pos2,
        color: Color32,
        dashed: bool,
    },
    Box(BoxGlyph),
    AxisTick {
        at: Pos2,
        label: String,
    },
}

/// Everything a view currently shows
#[derive(Debug, Clone, Default)]
pub struct Scene {
    marks: Vec<Mark>,
    overlays: Vec<Overlay>,
}

impl Scene {
    pub fn clear(&mut self) {
        self.marks.clear();
        self.overlays.clear();
    }

    pub fn push_mark(&mut self, record: RecordIdx, shape: MarkShape, color: Color32, palette: &EmphasisPalette) {
        self.marks.push(Mark {
            record,
            shape,
            color,
            emphasis: Emphasis::Baseline,
            style: palette.style(Emphasis::Baseline, color),
        });
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn mark(&self, record: RecordIdx) -> Option<&Mark> {
        self.marks.iter().find(|m| m.record == record)
    }

    /// Records whose mark satisfies `hit`
    pub fn hits(&self, hit: impl Fn(&Mark) -> bool) -> RecordSet {
        self.marks.iter().filter(|m| hit(m)).map(|m| m.record).collect()
    }

    /// Re-derive emphasis and style of every mark
    pub fn restyle(&mut self, palette: &EmphasisPalette, emphasis: impl Fn(RecordIdx) -> Emphasis) {
        for mark in self.marks.iter_mut() {
            mark.emphasis = emphasis(mark.record);
            mark.style = palette.style(mark.emphasis, mark.color);
        }
    }

    pub fn count(&self, emphasis: Emphasis) -> usize {
        self.marks.iter().filter(|m| m.emphasis == emphasis).count()
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn push_overlay(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    /// Drop overlays matching `pred`
    pub fn remove_overlays(&mut self, pred: impl Fn(&Overlay) -> bool) {
        self.overlays.retain(|o| !pred(o));
    }

    pub fn set_brush(&mut self, region: Option<Rect>) {
        self.remove_overlays(|o| matches!(o, Overlay::Brush(_)));
        if let Some(region) = region {
            self.overlays.push(Overlay::Brush(region));
        }
    }

    pub fn brush(&self) -> Option<Rect> {
        self.overlays.iter().find_map(|o| match o {
            Overlay::Brush(rect) => Some(*rect),
            _ => None,
        })
    }

    pub fn tick_labels(&self) -> Vec<&str> {
        self.overlays
            .iter()
            .filter_map(|o| match o {
                Overlay::AxisTick { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const PALETTE: EmphasisPalette = EmphasisPalette {
        baseline: Look::new(0.6, 4.0),
        selected: Look::new(1.0, 5.0).colored(Color32::RED),
        context: Look::new(0.3, 3.0),
        dimmed: Look::new(0.05, 2.0),
    };

    #[test]
    fn test_plot_area_subtracts_margins() {
        let mount = MountPoint::new("laps", 850.0, 400.0);
        let area = mount.plot_area();
        assert_eq!(area.width(), 770.0);
        assert_eq!(area.height(), 330.0);
        assert_eq!(area.min, Pos2::ZERO);
    }

    #[test]
    fn test_mount_from_json_defaults_margin() {
        let json = r#"{"name": "laps", "size": {"x": 850.0, "y": 400.0}}"#;
        let mount: MountPoint = serde_json::from_str(json).unwrap();
        assert_eq!(mount.margin, Margin::default());
        assert_eq!(mount.plot_area().width(), 770.0);
    }

    #[test]
    fn test_restyle_applies_palette() {
        let mut scene = Scene::default();
        for i in 0..3 {
            scene.push_mark(
                RecordIdx(i),
                MarkShape::Dot { center: pos2(i as f32, 0.0) },
                Color32::GREEN,
                &PALETTE,
            );
        }
        assert_eq!(scene.count(Emphasis::Baseline), 3);

        scene.restyle(&PALETTE, |idx| {
            if idx == RecordIdx(1) {
                Emphasis::Selected
            } else {
                Emphasis::Dimmed
            }
        });
        let selected = scene.mark(RecordIdx(1)).unwrap();
        assert_eq!(selected.style.fill, Color32::RED);
        assert_eq!(selected.style.size, 5.0);
        assert_eq!(scene.mark(RecordIdx(0)).unwrap().style.fill, Color32::GREEN);
        assert_eq!(scene.count(Emphasis::Dimmed), 2);
    }

    #[test]
    fn test_brush_overlay_replaced() {
        let mut scene = Scene::default();
        scene.set_brush(Some(Rect::from_min_max(pos2(0.0, 0.0), pos2(5.0, 5.0))));
        scene.set_brush(Some(Rect::from_min_max(pos2(1.0, 1.0), pos2(2.0, 2.0))));
        assert_eq!(scene.overlays().len(), 1);
        scene.set_brush(None);
        assert_eq!(scene.brush(), None);
    }
}
