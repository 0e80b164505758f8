//! Linked plot views

pub mod box_plot;
pub mod lap_time;
pub mod parallel_coordinates;
pub mod scatter;
pub mod strategy;
pub mod utils;

pub use box_plot::DistributionView;
pub use lap_time::LapTimeView;
pub use parallel_coordinates::ParallelCoordinatesView;
pub use scatter::{ColorBy, PointCloudConfig, PointCloudView};
pub use strategy::StrategyStripView;
