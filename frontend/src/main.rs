mod app;

slint::include_modules!();

extern crate pretty_env_logger;
#[macro_use] extern crate log;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use ucd_deltat::{Datasets, Session};

fn main() -> Result<(), slint::PlatformError> {
    pretty_env_logger::init();

    info!("Starting urban heatmap frontend...");

    let settings = match app::config::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            app::config::Settings::default()
        }
    };

    let main_window = MainWindow::new()?;

    // Static datasets, loaded once and shared read-only by the session
    let datasets = match Datasets::load(&settings.geojson_path, &settings.csv_path) {
        Ok(datasets) => datasets,
        Err(e) => {
            error!("Failed to load datasets: {:#}", e);
            main_window.set_error_message(format!("Failed to load datasets: {:#}", e).into());
            Datasets::default()
        }
    };
    let session = Rc::new(RefCell::new(Session::new(Arc::new(datasets))));

    // Initial basemap load
    let viewport = settings.viewport();
    match tokio::runtime::Runtime::new() {
        Ok(rt) => {
            let basemap = rt.block_on(app::map::fetch_basemap(&viewport, &settings.tile_cache_dir));
            match basemap {
                Ok(basemap) => app::map::set_basemap(Some(basemap)),
                Err(e) => {
                    warn!("Failed to load basemap, drawing regions without it: {}", e);
                    app::map::set_basemap(None);
                }
            }
        }
        Err(e) => error!("Failed to start async runtime: {}", e),
    }

    app::heatmap::init_map_view(&main_window, &session.borrow(), &viewport);
    app::scatter::init_chart_view(&main_window, &session.borrow());
    app::setup_callbacks(&main_window, session.clone(), viewport);

    main_window.set_loading(false);

    info!("Urban heatmap frontend started successfully");

    // Run the main window - this blocks until the window is closed
    let result = main_window.run();

    info!("Main window closed");
    result
}
