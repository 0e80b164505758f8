//! Dashboard settings

use serde::{Deserialize, Serialize};

use crate::record::{FieldId, TagId};

/// Settings consumed by the coordinator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub analytics: AnalyticsSettings,
}

/// What the presentation surface displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Fields summarized on every cascade
    pub summary_fields: Vec<FieldId>,

    /// Lower is better
    pub performer_field: FieldId,

    /// Tag naming the best performer
    pub performer_tag: TagId,

    pub regression: RegressionSettings,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            summary_fields: vec![
                FieldId::LapTime,
                FieldId::TrackTemp,
                FieldId::AirTemp,
                FieldId::S1Delta,
                FieldId::S2Delta,
                FieldId::S3Delta,
                FieldId::SpeedTrap,
            ],
            performer_field: FieldId::LapTime,
            performer_tag: TagId::Driver,
            regression: RegressionSettings::default(),
        }
    }
}

/// Tyre degradation fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionSettings {
    pub enabled: bool,
    pub x: FieldId,
    pub y: FieldId,
    /// Multiplier from slope units to display units
    pub slope_scale: f64,
    pub slope_unit: String,
}

impl Default for RegressionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            x: FieldId::TyreLife,
            y: FieldId::LapTime,
            slope_scale: 1000.0,
            slope_unit: "ms/lap".to_string(),
        }
    }
}
