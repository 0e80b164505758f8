//! State shared by every concrete view

use std::sync::Arc;

use egui::{Pos2, Rect};
use pw_core::{Command, GestureEvent, RecordIdx, RecordSet, RecordStore, ViewId};
use uuid::Uuid;

use crate::brush::{BrushAxes, BrushTracker, BrushUpdate};
use crate::scene::{Emphasis, EmphasisPalette, MountPoint, Scene};

/// What a gesture amounted to once the brush has digested it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Gesture still running, or nothing happened
    Pending,
    Region(Rect),
    Click(Pos2),
    Release,
}

/// Identity, mount, scene and brush of one view
pub struct ViewFrame {
    pub id: ViewId,
    pub title: String,
    pub mount: MountPoint,
    pub store: Arc<RecordStore>,
    pub scene: Scene,
    pub brush: BrushTracker,
    /// Records passed to the last render
    pub rendered: RecordSet,
    /// Effective selection of the last highlight
    pub highlight: RecordSet,
}

impl ViewFrame {
    pub fn new(title: impl Into<String>, mount: MountPoint, store: Arc<RecordStore>, axes: BrushAxes) -> Self {
        let brush = BrushTracker::new(axes, mount.plot_area());
        let highlight = store.all();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            mount,
            store,
            scene: Scene::default(),
            brush,
            rendered: RecordSet::new(),
            highlight,
        }
    }

    pub fn plot_area(&self) -> Rect {
        self.mount.plot_area()
    }

    /// Whether the last highlight means "no active brush"
    pub fn highlight_is_full(&self) -> bool {
        self.highlight.is_empty() || self.store.is_full(&self.highlight)
    }

    /// Baseline, selected or dimmed against the last highlight
    pub fn emphasis(&self, record: RecordIdx) -> Emphasis {
        emphasis_against(self.highlight_is_full(), &self.highlight, record)
    }

    /// Restyle every mark against the last highlight
    pub fn restyle(&mut self, palette: &EmphasisPalette) {
        let full = self.highlight_is_full();
        let highlight = &self.highlight;
        self.scene
            .restyle(palette, |record| emphasis_against(full, highlight, record));
    }

    /// Feed a gesture to the brush, keeping the preview overlay in sync
    pub fn track(&mut self, gesture: &GestureEvent) -> GestureOutcome {
        match self.brush.handle(gesture) {
            BrushUpdate::Idle => GestureOutcome::Pending,
            BrushUpdate::Preview(region) => {
                self.scene.set_brush(Some(region));
                GestureOutcome::Pending
            }
            BrushUpdate::Completed(region) => {
                self.scene.set_brush(Some(region));
                GestureOutcome::Region(region)
            }
            BrushUpdate::Clicked(pos) => {
                self.scene.set_brush(None);
                GestureOutcome::Click(pos)
            }
            BrushUpdate::Released => {
                self.scene.set_brush(None);
                GestureOutcome::Release
            }
        }
    }

    pub fn propose(&self, records: RecordSet) -> Command {
        Command::CandidateSelection {
            origin: self.id,
            records,
        }
    }

    /// Selection the view shows for its own proposal
    pub fn local_selection(&self, proposal: &RecordSet) -> RecordSet {
        if proposal.is_empty() {
            self.store.all()
        } else {
            proposal.clone()
        }
    }
}

fn emphasis_against(full: bool, highlight: &RecordSet, record: RecordIdx) -> Emphasis {
    if full {
        Emphasis::Baseline
    } else if highlight.contains(record) {
        Emphasis::Selected
    } else {
        Emphasis::Dimmed
    }
}
