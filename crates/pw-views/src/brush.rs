//! Brush gesture tracking
//!
//! Turns raw gesture events into a region. Intermediate moves only produce a
//! preview; a region is reported once, when the gesture ends.

use egui::{pos2, Pos2, Rect};
use pw_core::GestureEvent;

/// Pointer travel below which a gesture counts as a click
pub const CLICK_TOLERANCE: f32 = 3.0;

/// Dimensions a brush constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushAxes {
    XY,
    /// Full-height band
    X,
    /// Full-width band
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushUpdate {
    /// Nothing to report
    Idle,
    /// Drag in progress
    Preview(Rect),
    /// Drag finished with a region
    Completed(Rect),
    /// Gesture ended without leaving the click tolerance
    Clicked(Pos2),
    /// Drag aborted
    Released,
}

#[derive(Debug, Clone)]
pub struct BrushTracker {
    axes: BrushAxes,
    extent: Rect,
    anchor: Option<Pos2>,
    preview: Option<Rect>,
}

impl BrushTracker {
    pub fn new(axes: BrushAxes, extent: Rect) -> Self {
        Self {
            axes,
            extent,
            anchor: None,
            preview: None,
        }
    }

    pub fn axes(&self) -> BrushAxes {
        self.axes
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn preview(&self) -> Option<Rect> {
        self.preview
    }

    pub fn handle(&mut self, gesture: &GestureEvent) -> BrushUpdate {
        match *gesture {
            GestureEvent::Start(pos) => {
                self.anchor = Some(self.clamp(pos));
                self.preview = None;
                BrushUpdate::Idle
            }
            GestureEvent::Move(pos) => match self.anchor {
                Some(anchor) => {
                    let region = self.region(anchor, self.clamp(pos));
                    self.preview = Some(region);
                    BrushUpdate::Preview(region)
                }
                None => BrushUpdate::Idle,
            },
            GestureEvent::End(pos) => {
                self.preview = None;
                let Some(anchor) = self.anchor.take() else {
                    return BrushUpdate::Idle;
                };
                let end = self.clamp(pos);
                if self.travel(anchor, end) <= CLICK_TOLERANCE {
                    BrushUpdate::Clicked(end)
                } else {
                    BrushUpdate::Completed(self.region(anchor, end))
                }
            }
            GestureEvent::Cancel => {
                self.anchor = None;
                self.preview = None;
                BrushUpdate::Released
            }
        }
    }

    fn clamp(&self, pos: Pos2) -> Pos2 {
        pos2(
            pos.x.clamp(self.extent.min.x, self.extent.max.x),
            pos.y.clamp(self.extent.min.y, self.extent.max.y),
        )
    }

    fn travel(&self, a: Pos2, b: Pos2) -> f32 {
        match self.axes {
            BrushAxes::XY => a.distance(b),
            BrushAxes::X => (a.x - b.x).abs(),
            BrushAxes::Y => (a.y - b.y).abs(),
        }
    }

    fn region(&self, a: Pos2, b: Pos2) -> Rect {
        match self.axes {
            BrushAxes::XY => Rect::from_two_pos(a, b),
            BrushAxes::X => Rect::from_min_max(
                pos2(a.x.min(b.x), self.extent.min.y),
                pos2(a.x.max(b.x), self.extent.max.y),
            ),
            BrushAxes::Y => Rect::from_min_max(
                pos2(self.extent.min.x, a.y.min(b.y)),
                pos2(self.extent.max.x, a.y.max(b.y)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(axes: BrushAxes) -> BrushTracker {
        BrushTracker::new(axes, Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 50.0)))
    }

    #[test]
    fn test_drag_previews_then_completes() {
        let mut brush = tracker(BrushAxes::XY);
        assert_eq!(brush.handle(&GestureEvent::Start(pos2(10.0, 10.0))), BrushUpdate::Idle);
        assert!(matches!(
            brush.handle(&GestureEvent::Move(pos2(20.0, 30.0))),
            BrushUpdate::Preview(_)
        ));
        assert!(brush.preview().is_some());

        let done = brush.handle(&GestureEvent::End(pos2(40.0, 30.0)));
        assert_eq!(
            done,
            BrushUpdate::Completed(Rect::from_min_max(pos2(10.0, 10.0), pos2(40.0, 30.0)))
        );
        assert!(!brush.is_active());
        assert!(brush.preview().is_none());
    }

    #[test]
    fn test_region_clamped_to_extent() {
        let mut brush = tracker(BrushAxes::XY);
        brush.handle(&GestureEvent::Start(pos2(-20.0, 10.0)));
        let done = brush.handle(&GestureEvent::End(pos2(500.0, 80.0)));
        assert_eq!(
            done,
            BrushUpdate::Completed(Rect::from_min_max(pos2(0.0, 10.0), pos2(100.0, 50.0)))
        );
    }

    #[test]
    fn test_small_travel_is_click() {
        let mut brush = tracker(BrushAxes::XY);
        brush.handle(&GestureEvent::Start(pos2(10.0, 10.0)));
        brush.handle(&GestureEvent::Move(pos2(11.0, 11.0)));
        assert_eq!(
            brush.handle(&GestureEvent::End(pos2(12.0, 11.0))),
            BrushUpdate::Clicked(pos2(12.0, 11.0))
        );
    }

    #[test]
    fn test_x_brush_spans_full_height() {
        let mut brush = tracker(BrushAxes::X);
        brush.handle(&GestureEvent::Start(pos2(60.0, 20.0)));
        // Vertical travel alone does not make a drag
        assert!(matches!(
            brush.handle(&GestureEvent::End(pos2(61.0, 45.0))),
            BrushUpdate::Clicked(_)
        ));

        brush.handle(&GestureEvent::Start(pos2(60.0, 20.0)));
        assert_eq!(
            brush.handle(&GestureEvent::End(pos2(30.0, 25.0))),
            BrushUpdate::Completed(Rect::from_min_max(pos2(30.0, 0.0), pos2(60.0, 50.0)))
        );
    }

    #[test]
    fn test_cancel_and_stray_end() {
        let mut brush = tracker(BrushAxes::Y);
        brush.handle(&GestureEvent::Start(pos2(5.0, 5.0)));
        assert_eq!(brush.handle(&GestureEvent::Cancel), BrushUpdate::Released);
        assert_eq!(brush.handle(&GestureEvent::End(pos2(5.0, 40.0))), BrushUpdate::Idle);
        assert_eq!(brush.handle(&GestureEvent::Move(pos2(5.0, 40.0))), BrushUpdate::Idle);
    }
}
