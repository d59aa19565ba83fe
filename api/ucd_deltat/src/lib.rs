//! Seasonal surface temperature anomaly (ΔT) data for urban centres.
//!
//! Loads the region polygons (GeoJSON) and the table of seasonal day/night
//! means (CSV), and derives everything the dashboard shows from them: colored
//! polygons for the map, filtered rows and scatter points for the chart.

use anyhow::Result;
use log::info;
use std::path::Path;

pub mod palette;
pub mod regions;
pub mod scatter;
pub mod session;
pub mod table;
pub mod variable;

pub use palette::{bucket_for, color_for, Bucket};
pub use regions::{colorize, format_value, ColoredRegion, ColoredRegions, Popup, Region, RegionCollection, COLOR_FIELD};
pub use scatter::{ScatterPoint, ScatterSeries, X_AXIS_LABEL, Y_AXIS_LABEL};
pub use session::{SelectionChange, SelectionState, Session, View};
pub use table::{DeltaTRow, DeltaTTable};
pub use variable::{DayPeriod, DeltaTVariable, Season};

/// Region name property / column shared by both datasets
pub const REGION_NAME_FIELD: &str = "UC_NM_MN";

/// Region shown on the chart until the user picks another
pub const DEFAULT_REGION: &str = "Karlsruhe [DEU]";

/// Both static datasets, loaded once and shared read-only between sessions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub regions: RegionCollection,
    pub table: DeltaTTable,
    region_names: Vec<String>,
}

impl Datasets {
    pub fn new(regions: RegionCollection, table: DeltaTTable) -> Self {
        let region_names = table.region_names();
        Self {
            regions,
            table,
            region_names,
        }
    }

    pub fn load(geojson_path: &Path, csv_path: &Path) -> Result<Self> {
        let regions = RegionCollection::load(geojson_path)?;
        let table = DeltaTTable::load(csv_path)?;
        let datasets = Self::new(regions, table);
        info!(
            "Datasets ready: {} polygons, {} distinct chart regions",
            datasets.regions.len(),
            datasets.region_names.len()
        );
        Ok(datasets)
    }

    /// Sorted distinct names from the table, the chart dropdown options
    pub fn region_names(&self) -> &[String] {
        &self.region_names
    }
}
