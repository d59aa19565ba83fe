use log::{debug, warn};

use crate::table::DeltaTRow;
use crate::variable::Season;

pub const X_AXIS_LABEL: &str = "ΔT (Day) °C";
pub const Y_AXIS_LABEL: &str = "ΔT (Night) °C";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub season: Season,
    pub day: f64,
    pub night: f64,
}

/// Day-vs-night points for one selected region
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub region_name: String,
    pub title: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSeries {
    /// Build one point per season per row, seasons in Winter..Fall order.
    /// Seasons missing either value are skipped.
    pub fn from_rows(region_name: &str, rows: &[DeltaTRow]) -> Self {
        if rows.is_empty() {
            warn!("No ΔT rows for {}, chart will be empty", region_name);
        } else if rows.len() > 1 {
            warn!(
                "{} ΔT rows match {}, plotting every row's seasons",
                rows.len(),
                region_name
            );
        }

        let mut points = Vec::with_capacity(rows.len() * Season::ALL.len());
        for row in rows {
            for season in Season::ALL {
                match row.season_pair(season) {
                    (Some(day), Some(night)) => points.push(ScatterPoint { season, day, night }),
                    pair => debug!("Skipping {} for {}: {:?}", season, region_name, pair),
                }
            }
        }

        Self {
            region_name: region_name.to_string(),
            title: format!("ΔT: Day vs Night ({})", region_name),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// ((x_min, x_max), (y_min, y_max)) covering every point and zero, padded
    pub fn axis_range(&self) -> ((f64, f64), (f64, f64)) {
        let x = padded_range(self.points.iter().map(|p| p.day));
        let y = padded_range(self.points.iter().map(|p| p.night));
        (x, y)
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    // Scale before subtracting so a huge spread stays finite
    let pad = (max * 0.1 - min * 0.1).max(1.0);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, values: [f64; 8]) -> DeltaTRow {
        DeltaTRow {
            name: Some(name.to_string()),
            winter_day: Some(values[0]),
            winter_night: Some(values[1]),
            spring_day: Some(values[2]),
            spring_night: Some(values[3]),
            summer_day: Some(values[4]),
            summer_night: Some(values[5]),
            fall_day: Some(values[6]),
            fall_night: Some(values[7]),
        }
    }

    #[test]
    fn test_single_row_gives_four_seasons_in_order() {
        let rows = vec![row("Karlsruhe [DEU]", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])];
        let series = ScatterSeries::from_rows("Karlsruhe [DEU]", &rows);

        assert_eq!(series.title, "ΔT: Day vs Night (Karlsruhe [DEU])");
        let seasons: Vec<_> = series.points.iter().map(|p| p.season).collect();
        assert_eq!(seasons, Season::ALL);
        assert_eq!(series.points[2], ScatterPoint { season: Season::Summer, day: 5.0, night: 6.0 });
        assert_eq!(series.points[3], ScatterPoint { season: Season::Fall, day: 7.0, night: 8.0 });
    }

    #[test]
    fn test_empty_rows_give_empty_series() {
        let series = ScatterSeries::from_rows("Atlantis", &[]);
        assert!(series.is_empty());
        assert_eq!(series.axis_range(), ((-1.0, 1.0), (-1.0, 1.0)));
    }

    #[test]
    fn test_missing_values_skip_the_season() {
        let mut r = row("Mannheim [DEU]", [1.0; 8]);
        r.spring_night = None;
        let series = ScatterSeries::from_rows("Mannheim [DEU]", &[r]);
        let seasons: Vec<_> = series.points.iter().map(|p| p.season).collect();
        assert_eq!(seasons, vec![Season::Winter, Season::Summer, Season::Fall]);
    }

    #[test]
    fn test_duplicate_rows_keep_season_labels_aligned() {
        let rows = vec![
            row("Springfield", [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5]),
            row("Springfield", [-1.0, -1.5, -2.0, -2.5, -3.0, -3.5, -4.0, -4.5]),
        ];
        let series = ScatterSeries::from_rows("Springfield", &rows);
        assert_eq!(series.points.len(), 8);
        assert_eq!(series.points[4], ScatterPoint { season: Season::Winter, day: -1.0, night: -1.5 });
    }

    #[test]
    fn test_axis_range_includes_zero() {
        let rows = vec![row("Hot", [5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0])];
        let ((x0, x1), (y0, y1)) = ScatterSeries::from_rows("Hot", &rows).axis_range();
        assert!(x0 < 0.0 && x1 > 11.0);
        assert!(y0 < 0.0 && y1 > 12.0);
    }

    #[test]
    fn test_axis_range_stays_finite() {
        let mut r = row("Extreme", [1.0e308, -1.0e308, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        r.spring_day = Some(f64::INFINITY);
        let series = ScatterSeries::from_rows("Extreme", &[r]);
        // The infinite spring value is dropped with its season
        assert_eq!(series.points.len(), 3);
        let ((x0, x1), (y0, y1)) = series.axis_range();
        assert!([x0, x1, y0, y1].iter().all(|v| v.is_finite()));
        assert!(x1 >= 1.0e308 && y0 <= -1.0e308);
    }

    #[test]
    fn test_padded_range_ignores_non_finite() {
        let range = padded_range([f64::INFINITY, 2.0, f64::NEG_INFINITY].into_iter());
        assert_eq!(range, (-1.0, 3.0));
    }
}
