//! Application configuration

use std::path::Path;

use anyhow::{Context, Result};
use pw_core::DashboardSettings;
use pw_data::LoadConfig;
use pw_views::MountPoint;
use serde::{Deserialize, Serialize};

/// Everything read from the optional JSON config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How the lap table is read; `path` is overridden by the command line
    pub load: LoadConfig,

    pub dashboard: DashboardSettings,

    pub layout: ViewLayout,
}

/// Mount point of every dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewLayout {
    pub cloud: MountPoint,
    pub degradation: MountPoint,
    pub parallel: MountPoint,
    pub laps: MountPoint,
    pub strategy: MountPoint,
    pub distribution: MountPoint,
}

impl Default for ViewLayout {
    fn default() -> Self {
        Self {
            cloud: MountPoint::new("#scatterplot", 500.0, 400.0),
            degradation: MountPoint::new("#tyre-degradation", 500.0, 400.0),
            parallel: MountPoint::new("#parallel-coordinates", 850.0, 400.0),
            laps: MountPoint::new("#lap-time-delta", 850.0, 400.0),
            strategy: MountPoint::new("#strategy-bar", 850.0, 300.0),
            distribution: MountPoint::new("#boxplot", 200.0, 200.0),
        }
    }
}

impl AppConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load settings for `data_path`, merged with an optional config file
    pub fn resolve(data_path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.load.path = data_path.to_path_buf();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::FieldId;

    #[test]
    fn test_partial_config() {
        let json = r##"{
            "load": { "delimiter": ";" },
            "dashboard": { "analytics": { "summary_fields": ["lap_time", "air_temp"] } },
            "layout": { "laps": { "name": "#laps", "size": { "x": 600.0, "y": 300.0 } } }
        }"##;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.load.delimiter, ';');
        assert_eq!(
            config.dashboard.analytics.summary_fields,
            vec![FieldId::LapTime, FieldId::AirTemp]
        );
        assert_eq!(config.layout.laps.size.x, 600.0);
        assert_eq!(config.layout.cloud, ViewLayout::default().cloud);
        assert!(config.dashboard.analytics.regression.enabled);
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let config = AppConfig::resolve(Path::new("data/laps.csv"), None).unwrap();
        assert_eq!(config.load.path, Path::new("data/laps.csv"));
        assert_eq!(config.dashboard, DashboardSettings::default());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = AppConfig::resolve(Path::new("laps.csv"), Some(Path::new("/nonexistent/pitwall.json")));
        assert!(err.is_err());
    }
}
