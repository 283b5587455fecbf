//! Runtime settings for the forecast portal
//!
//! Defaults come from `constants`. An optional JSON file may override any
//! subset of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    AOI_POINTS, DEFAULT_BOUNDARY_PATH, DEFAULT_INTER_DELAY_MS, DEFAULT_MAP_ZOOM, NWS_API_BASE,
    PHOENIX_CENTER, USER_AGENT,
};
use crate::models::GeoPoint;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL of the NWS API
    pub api_base: String,
    /// Identification header sent with every request
    pub user_agent: String,
    /// Pause between two points of a fetch cycle
    pub inter_delay_ms: u64,
    /// GeoJSON file with the AOI boundary
    pub boundary_path: PathBuf,
    /// Main forecast location and map centre
    pub center: GeoPoint,
    pub center_label: String,
    pub zoom: u8,
    /// Points fetched on every AOI cycle, in order
    pub points: Vec<GeoPoint>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base: NWS_API_BASE.to_string(),
            user_agent: USER_AGENT.to_string(),
            inter_delay_ms: DEFAULT_INTER_DELAY_MS,
            boundary_path: PathBuf::from(DEFAULT_BOUNDARY_PATH),
            center: PHOENIX_CENTER,
            center_label: "Phoenix, AZ".to_string(),
            zoom: DEFAULT_MAP_ZOOM,
            points: AOI_POINTS.to_vec(),
        }
    }
}

impl PortalConfig {
    /// Loads `path`, falling back to the defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config {}", path.display()))
            }
        };
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            anyhow::bail!("api_base must not be empty");
        }
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }
        if let Some(point) = self.points.iter().chain([&self.center]).find(|p| !p.is_valid()) {
            anyhow::bail!("invalid coordinates {}", point);
        }
        Ok(())
    }

    pub fn inter_delay(&self) -> Duration {
        Duration::from_millis(self.inter_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PortalConfig::default();
        assert_eq!(config.api_base, "https://api.weather.gov");
        assert_eq!(config.inter_delay(), Duration::from_secs(1));
        assert_eq!(config.points.len(), 5);
        assert_eq!(config.points[0], config.center);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = PortalConfig::from_json(
            r#"{"inter_delay_ms": 250, "points": [{"latitude": 33.0, "longitude": -111.0}]}"#,
        )
        .unwrap();
        assert_eq!(config.inter_delay_ms, 250);
        assert_eq!(config.points, vec![GeoPoint::new(33.0, -111.0)]);
        assert_eq!(config.user_agent, USER_AGENT);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(PortalConfig::from_json(r#"{"api_base": ""}"#).is_err());
        assert!(PortalConfig::from_json(
            r#"{"points": [{"latitude": 133.0, "longitude": -111.0}]}"#
        )
        .is_err());
        assert!(PortalConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forecast-portal.json");
        std::fs::write(&path, r#"{"inter_delay_ms": 500, "center_label": "Tempe, AZ"}"#).unwrap();

        let config = PortalConfig::load_or_default(&path).unwrap();
        assert_eq!(config.inter_delay(), Duration::from_millis(500));
        assert_eq!(config.center_label, "Tempe, AZ");
        assert_eq!(config.api_base, NWS_API_BASE);
    }

    #[test]
    fn test_load_unparseable_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forecast-portal.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = PortalConfig::load_or_default(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_directory_path_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = PortalConfig::load_or_default(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = PortalConfig::load_or_default(Path::new("/nonexistent/portal.json")).unwrap();
        assert_eq!(config.points.len(), 5);
    }
}
