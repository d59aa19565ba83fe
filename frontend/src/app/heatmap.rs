use image::RgbImage;
use plotters::prelude::*;
use slint::{ModelRc, VecModel};
use openstreetmap::Viewport;
use ucd_deltat::{Bucket, ColoredRegions, DeltaTVariable, Session};
use crate::{LegendEntry, MainWindow};
use crate::app::map::BASEMAP;
use crate::app::utils::{clear_error_from, rgb_buffer_to_slint_image, string_model};

pub const MAP_WIDTH: u32 = 960;
pub const MAP_HEIGHT: u32 = 600;

const FILL_OPACITY: f64 = 0.7;
const OUTLINE_WIDTH: u32 = 2;
const BACKGROUND: RGBColor = RGBColor(0xe5, 0xe3, 0xdf);
const MAP_RENDER_ERROR: &str = "Failed to render map";

/// Draw the colored regions over the basemap, returning a packed RGB buffer
/// of the viewport's size
pub fn render_choropleth(
    colored: &ColoredRegions,
    viewport: &Viewport,
    basemap: Option<&RgbImage>,
) -> anyhow::Result<Vec<u8>> {
    let (width, height) = (viewport.width, viewport.height);
    let basemap = basemap.filter(|img| img.dimensions() == (width, height));

    let mut buffer = match basemap {
        Some(img) => img.as_raw().clone(),
        None => vec![0; (width * height * 3) as usize],
    };

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        if basemap.is_none() {
            root.fill(&BACKGROUND)?;
        }

        for region in &colored.regions {
            let (r, g, b) = region.bucket.rgb();
            let color = RGBColor(r, g, b);

            for rings in region.polygons() {
                // Holes are not cut out of the fill
                let Some(exterior) = rings.first() else { continue };
                let mut points: Vec<(i32, i32)> = exterior
                    .iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| {
                        let (x, y) = viewport.project(p[1], p[0]);
                        (x.round() as i32, y.round() as i32)
                    })
                    .collect();
                if points.len() < 3 {
                    continue;
                }

                root.draw(&Polygon::new(points.clone(), color.mix(FILL_OPACITY).filled()))?;
                let first = points[0];
                points.push(first);
                root.draw(&PathElement::new(points, color.stroke_width(OUTLINE_WIDTH)))?;
            }
        }

        root.present()?;
    }

    Ok(buffer)
}

pub fn legend_model() -> ModelRc<LegendEntry> {
    let entries: Vec<LegendEntry> = Bucket::LEGEND
        .iter()
        .map(|bucket| {
            let (r, g, b) = bucket.rgb();
            LegendEntry {
                color: slint::Color::from_rgb_u8(r, g, b),
                label: bucket.legend_label().into(),
            }
        })
        .collect();
    ModelRc::new(VecModel::from(entries))
}

pub fn init_map_view(main_window: &MainWindow, session: &Session, viewport: &Viewport) {
    main_window.set_variable_labels(string_model(DeltaTVariable::ALL.iter().map(|v| v.label())));
    main_window.set_legend(legend_model());
    main_window.set_map_width(viewport.width as f32);
    main_window.set_map_height(viewport.height as f32);
    show_map(main_window, session, viewport);
}

/// Re-render the map for the session's current colored regions
pub fn show_map(main_window: &MainWindow, session: &Session, viewport: &Viewport) {
    let colored = session.colored_regions();
    main_window.set_variable_index(colored.variable.index() as i32);
    // A popup from the previous variable would show a stale value
    main_window.set_popup_visible(false);

    let rendered = {
        let basemap = BASEMAP.lock().unwrap_or_else(|p| p.into_inner());
        render_choropleth(colored, viewport, basemap.as_ref())
    };

    match rendered {
        Ok(buffer) => {
            main_window.set_map_image(rgb_buffer_to_slint_image(&buffer, viewport.width, viewport.height));
            clear_error_from(main_window, MAP_RENDER_ERROR);
            info!("Map rendered for {} ({} regions)", colored.variable.label(), colored.len());
        }
        Err(e) => {
            error!("{}: {}", MAP_RENDER_ERROR, e);
            main_window.set_error_message(format!("{}: {}", MAP_RENDER_ERROR, e).into());
        }
    }
}

/// Handle a click at a position given as a fraction of the map size
pub fn handle_map_click(main_window: &MainWindow, session: &Session, viewport: &Viewport, fx: f32, fy: f32) {
    let x = fx as f64 * viewport.width as f64;
    let y = fy as f64 * viewport.height as f64;
    let (lat, lon) = viewport.unproject(x, y);

    match session.click(lon, lat) {
        Some(popup) => {
            debug!("Clicked {} at ({:.4}, {:.4})", popup.region, lat, lon);
            main_window.set_popup_text(popup.to_string().into());
            main_window.set_popup_x(fx);
            main_window.set_popup_y(fy);
            main_window.set_popup_visible(true);
        }
        None => {
            debug!("No region at ({:.4}, {:.4})", lat, lon);
            main_window.set_popup_visible(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucd_deltat::{colorize, RegionCollection};

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "UC_NM_MN": "Karlsruhe [DEU]", "DeltaT_Summer_Night_mean": 7.2 },
            "geometry": { "type": "Polygon", "coordinates": [[[8.4, 49.25], [8.5, 49.25], [8.5, 49.35], [8.4, 49.35], [8.4, 49.25]]] }
        }]
    }"#;

    fn pixel(buffer: &[u8], x: u32, y: u32) -> (u8, u8, u8) {
        let i = ((y * MAP_WIDTH + x) * 3) as usize;
        (buffer[i], buffer[i + 1], buffer[i + 2])
    }

    #[test]
    fn test_render_choropleth_fills_region() {
        let regions = RegionCollection::from_reader(SQUARE.as_bytes()).unwrap();
        let colored = colorize(&regions, DeltaTVariable::default());
        let viewport = Viewport::new(49.3, 8.45, 9, MAP_WIDTH, MAP_HEIGHT);

        let buffer = render_choropleth(&colored, &viewport, None).unwrap();
        assert_eq!(buffer.len(), (MAP_WIDTH * MAP_HEIGHT * 3) as usize);

        // Far corner keeps the background
        assert_eq!(pixel(&buffer, 5, 5), (0xe5, 0xe3, 0xdf));

        // Centre is tinted towards #e08214
        let (_, _, blue) = pixel(&buffer, MAP_WIDTH / 2, MAP_HEIGHT / 2);
        assert!(blue < 150, "blue channel {} not tinted", blue);
    }

    #[test]
    fn test_render_uses_matching_basemap_only() {
        let colored = colorize(&RegionCollection::default(), DeltaTVariable::default());
        let viewport = Viewport::new(49.3, 8.45, 9, MAP_WIDTH, MAP_HEIGHT);

        let basemap = RgbImage::from_pixel(MAP_WIDTH, MAP_HEIGHT, image::Rgb([10, 20, 30]));
        let buffer = render_choropleth(&colored, &viewport, Some(&basemap)).unwrap();
        assert_eq!(pixel(&buffer, 100, 100), (10, 20, 30));

        let wrong_size = RgbImage::new(10, 10);
        let buffer = render_choropleth(&colored, &viewport, Some(&wrong_size)).unwrap();
        assert_eq!(pixel(&buffer, 100, 100), (0xe5, 0xe3, 0xdf));
    }

    #[test]
    fn test_legend_has_nine_entries() {
        use slint::Model;
        let legend = legend_model();
        assert_eq!(legend.row_count(), 9);
        let first = legend.row_data(0).unwrap();
        assert_eq!(first.label, "> 9");
        assert_eq!(first.color, slint::Color::from_rgb_u8(0xb3, 0x58, 0x06));
    }
}
