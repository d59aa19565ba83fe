use std::path::{Path, PathBuf};
use std::sync::Mutex;
use once_cell::sync::Lazy;
use serde::Deserialize;
use openstreetmap::{Viewport, MAX_ZOOM};
use crate::app::heatmap::{MAP_HEIGHT, MAP_WIDTH};

pub const SETTINGS_FILE: &str = "heatmap.json";

pub static CACHED_SETTINGS: Lazy<Mutex<Option<Settings>>> = Lazy::new(|| Mutex::new(None));

/// Contents of `heatmap.json`; every field is optional
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub geojson_path: PathBuf,
    pub csv_path: PathBuf,
    /// (lat, lon) of the initial map view
    pub map_center: (f64, f64),
    pub zoom: u32,
    pub tile_cache_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            geojson_path: PathBuf::from("UCD_DeltaT.geojson"),
            csv_path: PathBuf::from("UCD_DeltaT.csv"),
            map_center: (49.3, 8.45),
            zoom: 9,
            tile_cache_dir: PathBuf::from("ui/images/"),
        }
    }
}

impl Settings {
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn viewport(&self) -> Viewport {
        let (lat, lon) = self.map_center;
        if self.zoom > MAX_ZOOM {
            warn!("Zoom {} is above the tile server maximum, using {}", self.zoom, MAX_ZOOM);
        }
        Viewport::new(lat, lon, self.zoom, MAP_WIDTH, MAP_HEIGHT)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    // Check cache first
    {
        let cached = CACHED_SETTINGS.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(settings) = cached.as_ref() {
            return Ok(settings.clone());
        }
    }

    let settings = load_settings_from(Path::new(SETTINGS_FILE))?;
    *CACHED_SETTINGS.lock().unwrap_or_else(|p| p.into_inner()) = Some(settings.clone());
    Ok(settings)
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let settings = Settings::from_json(&content)
                .map_err(|e| anyhow::anyhow!("Invalid {}: {}", path.display(), e))?;
            info!("Loaded settings from {}", path.display());
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("{} not found, using default settings", path.display());
            Ok(Settings::default())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = Settings::from_json(r#"{ "csv_path": "data/deltat.csv", "zoom": 6 }"#).unwrap();
        assert_eq!(settings.csv_path, PathBuf::from("data/deltat.csv"));
        assert_eq!(settings.zoom, 6);
        assert_eq!(settings.geojson_path, Settings::default().geojson_path);
        assert_eq!(settings.map_center, (49.3, 8.45));
    }

    #[test]
    fn test_map_center_from_array() {
        let settings = Settings::from_json(r#"{ "map_center": [52.52, 13.4] }"#).unwrap();
        let viewport = settings.viewport();
        assert_eq!((viewport.center_lat, viewport.center_lon), (52.52, 13.4));
        assert_eq!((viewport.width, viewport.height), (MAP_WIDTH, MAP_HEIGHT));
    }

    #[test]
    fn test_zoom_is_clamped_to_tile_maximum() {
        let settings = Settings::from_json(r#"{ "zoom": 40 }"#).unwrap();
        assert_eq!(settings.viewport().zoom, MAX_ZOOM);
        assert_eq!(Settings::default().viewport().zoom, 9);
    }

    #[test]
    fn test_malformed_settings_are_an_error() {
        assert!(Settings::from_json(r#"{ "zoom": "nine" }"#).is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = load_settings_from(Path::new("does/not/exist/heatmap.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
