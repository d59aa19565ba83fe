use futures::future::try_join_all;
use image::{DynamicImage, GenericImage, RgbImage};
use log::{debug, info};
use reqwest::Client;
use std::f64::consts::PI;
use std::path::Path;

pub const TILE_SIZE: u32 = 256;
/// Highest zoom level served by the OSM tile servers
pub const MAX_ZOOM: u32 = 19;

const TILE_URL: &str = "https://tile.openstreetmap.org";
const USER_AGENT: &str = concat!("urban-heatmap/", env!("CARGO_PKG_VERSION"));

/// Convert lat/lon to OSM tile number at zoom z (pure function)
pub fn lat_lon_to_tile(lat_deg: f64, lon_deg: f64, zoom: u32) -> (u32, u32) {
    let (x, y) = lat_lon_to_pixel(lat_deg, lon_deg, zoom);
    ((x / TILE_SIZE as f64).floor() as u32, (y / TILE_SIZE as f64).floor() as u32)
}

/// Convert lat/lon to world pixel coordinates at zoom z (pure function)
pub fn lat_lon_to_pixel(lat_deg: f64, lon_deg: f64, zoom: u32) -> (f64, f64) {
    let lat_rad = lat_deg.to_radians();
    let n = TILE_SIZE as f64 * 2u32.pow(zoom) as f64;
    let x = ((lon_deg + 180.0) / 360.0) * n;
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0) * n;
    (x, y)
}

/// Inverse of [`lat_lon_to_pixel`]
pub fn pixel_to_lat_lon(x: f64, y: f64, zoom: u32) -> (f64, f64) {
    let n = TILE_SIZE as f64 * 2u32.pow(zoom) as f64;
    let lon = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    (lat, lon)
}

/// A fixed window onto the web-mercator map, `width` x `height` pixels
/// centred on (`center_lat`, `center_lon`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// `zoom` is clamped to [`MAX_ZOOM`]
    pub fn new(center_lat: f64, center_lon: f64, zoom: u32, width: u32, height: u32) -> Self {
        Self {
            center_lat,
            center_lon,
            zoom: zoom.min(MAX_ZOOM),
            width,
            height,
        }
    }

    /// World pixel position of the viewport's top-left corner
    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = lat_lon_to_pixel(self.center_lat, self.center_lon, self.zoom);
        (cx - self.width as f64 / 2.0, cy - self.height as f64 / 2.0)
    }

    /// lat/lon to viewport pixel coordinates (may fall outside the viewport)
    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let (ox, oy) = self.origin();
        let (x, y) = lat_lon_to_pixel(lat, lon, self.zoom);
        (x - ox, y - oy)
    }

    /// Viewport pixel coordinates to (lat, lon)
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let (ox, oy) = self.origin();
        pixel_to_lat_lon(ox + x, oy + y, self.zoom)
    }

    /// (lat_min, lon_min, lat_max, lon_max) covered by the viewport
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let (lat_max, lon_min) = self.unproject(0.0, 0.0);
        let (lat_min, lon_max) = self.unproject(self.width as f64, self.height as f64);
        (lat_min, lon_min, lat_max, lon_max)
    }

    /// Inclusive tile ranges ((x_start, x_end), (y_start, y_end)) under the viewport
    pub fn tile_range(&self) -> ((u32, u32), (u32, u32)) {
        let (ox, oy) = self.origin();
        let max_tile = 2u32.pow(self.zoom) as i64 - 1;
        let to_tile = |p: f64| ((p / TILE_SIZE as f64).floor() as i64).clamp(0, max_tile) as u32;
        (
            (to_tile(ox), to_tile(ox + self.width as f64 - 1.0)),
            (to_tile(oy), to_tile(oy + self.height as f64 - 1.0)),
        )
    }

    /// Cache file name identifying this viewport
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_z{}_{}x{}.png",
            self.center_lat, self.center_lon, self.zoom, self.width, self.height
        )
    }
}

/// OpenStreetMap tile API client
pub struct OpenStreetMapAPI {
    client: Client,
}

impl OpenStreetMapAPI {
    /// Create a new OpenStreetMapAPI instance
    pub fn new() -> Self {
        // The tile servers reject requests without an identifying user agent
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Download a single tile as an image (async)
    pub async fn download_tile(&self, z: u32, x: u32, y: u32) -> Result<DynamicImage, anyhow::Error> {
        let url = format!("{}/{}/{}/{}.png", TILE_URL, z, x, y);
        debug!("Downloading {}", url);
        let resp = self.client.get(&url).send().await?;
        if resp.status().is_success() {
            let bytes = resp.bytes().await?;
            Ok(image::load_from_memory(&bytes)?)
        } else {
            Err(anyhow::anyhow!("Failed to download tile {}: HTTP {}", url, resp.status()))
        }
    }

    /// Download all tiles in the given inclusive ranges as a vector of rows
    pub async fn download_tiles(
        &self,
        x_range: (u32, u32),
        y_range: (u32, u32),
        zoom: u32,
    ) -> Result<Vec<Vec<DynamicImage>>, anyhow::Error> {
        let (x_start, x_end) = x_range;
        let (y_start, y_end) = y_range;

        let futures: Vec<_> = (y_start..=y_end)
            .flat_map(|y| (x_start..=x_end).map(move |x| (x, y)))
            .map(|(x, y)| self.download_tile(zoom, x, y))
            .collect();

        // Download all tiles in parallel
        let tiles_flat = try_join_all(futures).await?;

        let columns = (x_end - x_start + 1) as usize;
        Ok(tiles_flat.chunks(columns).map(|row| row.to_vec()).collect())
    }

    /// Stitch tiles into a single image
    pub fn stitch_tiles(tiles: &[Vec<DynamicImage>]) -> DynamicImage {
        let width = tiles.first().map_or(0, |row| row.len()) as u32 * TILE_SIZE;
        let height = tiles.len() as u32 * TILE_SIZE;

        let mut final_image = DynamicImage::new_rgb8(width, height);

        tiles.iter().enumerate().for_each(|(row_idx, row)| {
            row.iter().enumerate().for_each(|(col_idx, tile)| {
                let _ = final_image.copy_from(tile, col_idx as u32 * TILE_SIZE, row_idx as u32 * TILE_SIZE);
            });
        });

        final_image
    }

    /// Download, stitch and crop the basemap for a viewport
    pub async fn render_viewport(&self, viewport: &Viewport) -> Result<RgbImage, anyhow::Error> {
        let (x_range, y_range) = viewport.tile_range();
        info!(
            "Fetching {} basemap tiles at zoom {}",
            (x_range.1 - x_range.0 + 1) * (y_range.1 - y_range.0 + 1),
            viewport.zoom
        );

        let tiles = self.download_tiles(x_range, y_range, viewport.zoom).await?;
        let stitched = Self::stitch_tiles(&tiles).to_rgb8();

        // Offset of the viewport inside the stitched tiles
        let (ox, oy) = viewport.origin();
        let offset_x = (ox - (x_range.0 * TILE_SIZE) as f64).max(0.0) as u32;
        let offset_y = (oy - (y_range.0 * TILE_SIZE) as f64).max(0.0) as u32;

        let mut basemap = RgbImage::new(viewport.width, viewport.height);
        for (x, y, pixel) in basemap.enumerate_pixels_mut() {
            if let Some(source) = stitched.get_pixel_checked(offset_x + x, offset_y + y) {
                *pixel = *source;
            }
        }
        Ok(basemap)
    }

    /// Render a viewport basemap and save it as PNG
    pub async fn save_viewport(&self, viewport: &Viewport, output_path: &Path) -> Result<RgbImage, anyhow::Error> {
        let basemap = self.render_viewport(viewport).await?;
        basemap.save(output_path)?;
        info!("Saved basemap to {:?}", output_path);
        Ok(basemap)
    }
}

impl Default for OpenStreetMapAPI {
    fn default() -> Self {
        Self::new()
    }
}
