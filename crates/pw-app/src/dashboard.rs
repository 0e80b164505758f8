//! Dashboard assembly: the coordinator plus the six linked views

use std::sync::Arc;

use pw_core::{EventBus, PresentationSink, RecordStore, SelectionCoordinator, ViewId};
use pw_views::{
    DistributionView, LapTimeView, ParallelCoordinatesView, PointCloudConfig, PointCloudView, StrategyStripView,
};
use tracing::info;

use crate::config::AppConfig;

/// Short name used on the console, and the view behind it
pub struct NamedView {
    pub name: &'static str,
    pub id: ViewId,
}

pub struct Dashboard {
    coordinator: SelectionCoordinator,
    views: Vec<NamedView>,
    laps: ViewId,
}

impl Dashboard {
    pub fn build(store: Arc<RecordStore>, config: &AppConfig, event_bus: Arc<EventBus>) -> Self {
        let layout = &config.layout;
        let mut coordinator =
            SelectionCoordinator::new(store.clone(), config.dashboard.clone()).with_event_bus(event_bus);

        let mut views = Vec::new();
        let mut add = |name: &'static str, view: Box<dyn pw_core::ViewAdapter>| {
            let id = coordinator.register(view);
            views.push(NamedView { name, id });
            id
        };

        add(
            "cloud",
            Box::new(PointCloudView::new(
                "Lap clusters (PCA)",
                layout.cloud.clone(),
                store.clone(),
                PointCloudConfig::pca(),
            )),
        );
        add(
            "degradation",
            Box::new(PointCloudView::new(
                "Tyre degradation",
                layout.degradation.clone(),
                store.clone(),
                PointCloudConfig::tyre_degradation(),
            )),
        );
        add(
            "parallel",
            Box::new(ParallelCoordinatesView::new(
                "Sector deltas",
                layout.parallel.clone(),
                store.clone(),
            )),
        );
        let laps = add(
            "laps",
            Box::new(LapTimeView::new("Lap times", layout.laps.clone(), store.clone())),
        );
        add(
            "strategy",
            Box::new(StrategyStripView::new("Tyre strategy", layout.strategy.clone(), store.clone())),
        );
        add(
            "distribution",
            Box::new(DistributionView::new(
                "Lap time distribution",
                layout.distribution.clone(),
                store,
            )),
        );

        info!(views = views.len(), "Dashboard mounted");
        Self {
            coordinator,
            views,
            laps,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn PresentationSink>) {
        self.coordinator.add_sink(sink);
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut SelectionCoordinator {
        &mut self.coordinator
    }

    pub fn views(&self) -> &[NamedView] {
        &self.views
    }

    pub fn view_id(&self, name: &str) -> Option<ViewId> {
        self.views.iter().find(|v| v.name == name).map(|v| v.id)
    }

    /// The time-series view, target of toggle and focus commands
    pub fn lap_view(&self) -> ViewId {
        self.laps
    }

    pub fn lap_time_view(&self) -> Option<&LapTimeView> {
        self.coordinator.view::<LapTimeView>(self.laps)
    }
}
