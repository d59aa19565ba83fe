use plotters::prelude::*;
use ucd_deltat::{ScatterSeries, Session, X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::MainWindow;
use crate::app::utils::{clear_error_from, combo_index, rgb_buffer_to_slint_image, string_model};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 560;

const POINT_COLOR: RGBColor = RGBColor(255, 140, 0); // darkorange
const ZERO_LINE_COLOR: RGBColor = RGBColor(128, 128, 128);
const LABEL_OFFSET: f64 = 0.1;
const CHART_RENDER_ERROR: &str = "Failed to render chart";

/// Plot night against day for every point of the series
pub fn render_scatter(series: &ScatterSeries, width: u32, height: u32) -> anyhow::Result<Vec<u8>> {
    let mut buffer = vec![255u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let ((x_min, x_max), (y_min, y_max)) = series.axis_range();
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(&series.title, ("sans-serif", 22).into_font())
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(X_AXIS_LABEL)
            .y_desc(Y_AXIS_LABEL)
            .draw()?;

        // Zero reference lines
        chart.draw_series(LineSeries::new(vec![(x_min, 0.0), (x_max, 0.0)], ZERO_LINE_COLOR.stroke_width(1)))?;
        chart.draw_series(LineSeries::new(vec![(0.0, y_min), (0.0, y_max)], ZERO_LINE_COLOR.stroke_width(1)))?;

        chart.draw_series(
            series
                .points
                .iter()
                .map(|p| Circle::new((p.day, p.night), 7, POINT_COLOR.filled())),
        )?;
        chart.draw_series(series.points.iter().map(|p| {
            Text::new(
                p.season.name(),
                (p.day + LABEL_OFFSET, p.night),
                ("sans-serif", 14).into_font(),
            )
        }))?;

        if series.is_empty() {
            root.draw(&Text::new(
                "No data",
                (width as i32 / 2 - 40, height as i32 / 2),
                ("sans-serif", 24).into_font(),
            ))?;
        }

        root.present()?;
    }

    Ok(buffer)
}

pub fn init_chart_view(main_window: &MainWindow, session: &Session) {
    let names = session.datasets().region_names();
    main_window.set_region_names(string_model(names.iter().map(String::as_str)));
    main_window.set_chart_width(CHART_WIDTH as f32);
    main_window.set_chart_height(CHART_HEIGHT as f32);
    show_chart(main_window, session);
}

/// Re-render the chart for the session's current region
pub fn show_chart(main_window: &MainWindow, session: &Session) {
    let series = session.scatter();
    let names = session.datasets().region_names();
    main_window.set_region_index(combo_index(names, &session.selection().region_name));

    match render_scatter(series, CHART_WIDTH, CHART_HEIGHT) {
        Ok(buffer) => {
            main_window.set_chart_image(rgb_buffer_to_slint_image(&buffer, CHART_WIDTH, CHART_HEIGHT));
            clear_error_from(main_window, CHART_RENDER_ERROR);
            info!("Chart rendered for {} ({} points)", series.region_name, series.points.len());
        }
        Err(e) => {
            error!("{}: {}", CHART_RENDER_ERROR, e);
            main_window.set_error_message(format!("{}: {}", CHART_RENDER_ERROR, e).into());
        }
    }
}
