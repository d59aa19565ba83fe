use log::info;
use std::sync::Arc;

use crate::regions::{colorize, ColoredRegions, Popup};
use crate::scatter::ScatterSeries;
use crate::table::DeltaTRow;
use crate::variable::DeltaTVariable;
use crate::{Datasets, DEFAULT_REGION};

/// The two independent user selections
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub variable: DeltaTVariable,
    pub region_name: String,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            variable: DeltaTVariable::default(),
            region_name: DEFAULT_REGION.to_string(),
        }
    }
}

/// A single user input
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    Variable(DeltaTVariable),
    Region(String),
}

/// Render target whose inputs changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Map,
    Chart,
}

impl SelectionChange {
    /// variable -> colored regions -> map; region -> rows -> chart
    pub fn affected_view(&self) -> View {
        match self {
            SelectionChange::Variable(_) => View::Map,
            SelectionChange::Region(_) => View::Chart,
        }
    }
}

/// Per-user selection plus the state derived from it. The datasets are shared
/// read-only, so any number of sessions can sit on one [`Datasets`].
#[derive(Debug, Clone)]
pub struct Session {
    datasets: Arc<Datasets>,
    selection: SelectionState,
    colored: ColoredRegions,
    rows: Vec<DeltaTRow>,
    scatter: ScatterSeries,
}

impl Session {
    pub fn new(datasets: Arc<Datasets>) -> Self {
        Self::with_selection(datasets, SelectionState::default())
    }

    pub fn with_selection(datasets: Arc<Datasets>, selection: SelectionState) -> Self {
        let colored = colorize(&datasets.regions, selection.variable);
        let rows = datasets.table.filter_region(&selection.region_name);
        let scatter = ScatterSeries::from_rows(&selection.region_name, &rows);
        Self {
            datasets,
            selection,
            colored,
            rows,
            scatter,
        }
    }

    /// Apply one input and recompute only what depends on it
    pub fn apply(&mut self, change: SelectionChange) -> View {
        let view = change.affected_view();
        match change {
            SelectionChange::Variable(variable) => {
                info!("Map variable changed to {}", variable);
                self.selection.variable = variable;
                self.colored = colorize(&self.datasets.regions, variable);
            }
            SelectionChange::Region(region_name) => {
                info!("Chart region changed to {}", region_name);
                self.rows = self.datasets.table.filter_region(&region_name);
                self.scatter = ScatterSeries::from_rows(&region_name, &self.rows);
                self.selection.region_name = region_name;
            }
        }
        view
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn datasets(&self) -> &Arc<Datasets> {
        &self.datasets
    }

    pub fn colored_regions(&self) -> &ColoredRegions {
        &self.colored
    }

    pub fn chart_rows(&self) -> &[DeltaTRow] {
        &self.rows
    }

    pub fn scatter(&self) -> &ScatterSeries {
        &self.scatter
    }

    /// Popup for a map click at (lon, lat)
    pub fn click(&self, lon: f64, lat: f64) -> Option<Popup> {
        self.colored.popup_at(lon, lat)
    }
}
