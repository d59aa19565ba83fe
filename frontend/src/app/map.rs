use std::path::Path;
use std::sync::Mutex;
use image::RgbImage;
use once_cell::sync::Lazy;
use openstreetmap::{OpenStreetMapAPI, Viewport};

/// Basemap under the choropleth, `None` when it could not be fetched
pub static BASEMAP: Lazy<Mutex<Option<RgbImage>>> = Lazy::new(|| Mutex::new(None));

pub async fn fetch_basemap(viewport: &Viewport, cache_dir: &Path) -> anyhow::Result<RgbImage> {
    let filepath = cache_dir.join(viewport.file_name());

    // Check if the basemap already exists
    if filepath.exists() {
        info!("Basemap {} already exists, loading from disk", filepath.display());
        let basemap = image::open(&filepath)?.to_rgb8();
        if basemap.dimensions() == (viewport.width, viewport.height) {
            return Ok(basemap);
        }
        warn!("Cached basemap has the wrong size, fetching again");
    }

    info!("Basemap {} does not exist, fetching from OpenStreetMap", filepath.display());
    std::fs::create_dir_all(cache_dir)?;

    let api = OpenStreetMapAPI::new();
    api.save_viewport(viewport, &filepath).await
}

pub fn set_basemap(basemap: Option<RgbImage>) {
    *BASEMAP.lock().unwrap_or_else(|p| p.into_inner()) = basemap;
}
