use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::variable::{DayPeriod, DeltaTVariable, Season};

/// One row of the seasonal means table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeltaTRow {
    #[serde(rename = "UC_NM_MN", default)]
    pub name: Option<String>,
    #[serde(rename = "DeltaT_Winter_Day_mean", default, deserialize_with = "csv::invalid_option")]
    pub winter_day: Option<f64>,
    #[serde(rename = "DeltaT_Winter_Night_mean", default, deserialize_with = "csv::invalid_option")]
    pub winter_night: Option<f64>,
    #[serde(rename = "DeltaT_Spring_Day_mean", default, deserialize_with = "csv::invalid_option")]
    pub spring_day: Option<f64>,
    #[serde(rename = "DeltaT_Spring_Night_mean", default, deserialize_with = "csv::invalid_option")]
    pub spring_night: Option<f64>,
    #[serde(rename = "DeltaT_Summer_Day_mean", default, deserialize_with = "csv::invalid_option")]
    pub summer_day: Option<f64>,
    #[serde(rename = "DeltaT_Summer_Night_mean", default, deserialize_with = "csv::invalid_option")]
    pub summer_night: Option<f64>,
    #[serde(rename = "DeltaT_Fall_Day_mean", default, deserialize_with = "csv::invalid_option")]
    pub fall_day: Option<f64>,
    #[serde(rename = "DeltaT_Fall_Night_mean", default, deserialize_with = "csv::invalid_option")]
    pub fall_night: Option<f64>,
}

impl DeltaTRow {
    pub fn value(&self, variable: DeltaTVariable) -> Option<f64> {
        let value = match (variable.season, variable.period) {
            (Season::Winter, DayPeriod::Day) => self.winter_day,
            (Season::Winter, DayPeriod::Night) => self.winter_night,
            (Season::Spring, DayPeriod::Day) => self.spring_day,
            (Season::Spring, DayPeriod::Night) => self.spring_night,
            (Season::Summer, DayPeriod::Day) => self.summer_day,
            (Season::Summer, DayPeriod::Night) => self.summer_night,
            (Season::Fall, DayPeriod::Day) => self.fall_day,
            (Season::Fall, DayPeriod::Night) => self.fall_night,
        };
        value.filter(|v| v.is_finite())
    }

    /// (day, night) pair for a season
    pub fn season_pair(&self, season: Season) -> (Option<f64>, Option<f64>) {
        (
            self.value(DeltaTVariable::new(season, DayPeriod::Day)),
            self.value(DeltaTVariable::new(season, DayPeriod::Night)),
        )
    }
}

/// The static tabular dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaTTable {
    rows: Vec<DeltaTRow>,
}

impl DeltaTTable {
    pub fn new(rows: Vec<DeltaTRow>) -> Self {
        Self { rows }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize::<DeltaTRow>()
            .enumerate()
            .map(|(i, row)| row.with_context(|| format!("Invalid row {}", i + 1)))
            .collect::<Result<Vec<DeltaTRow>>>()?;
        Ok(Self::new(rows))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let table = Self::from_reader(file)
            .with_context(|| format!("Failed to load ΔT table from {}", path.display()))?;
        info!("Loaded {} ΔT rows from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn rows(&self) -> &[DeltaTRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted distinct region names, skipping rows without one
    pub fn region_names(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.name.as_deref())
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Rows whose name equals `region_name` exactly
    pub fn filter_region(&self, region_name: &str) -> Vec<DeltaTRow> {
        self.rows
            .iter()
            .filter(|row| row.name.as_deref() == Some(region_name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
UC_NM_MN,CTR_MN_NM,DeltaT_Winter_Day_mean,DeltaT_Winter_Night_mean,DeltaT_Spring_Day_mean,DeltaT_Spring_Night_mean,DeltaT_Summer_Day_mean,DeltaT_Summer_Night_mean,DeltaT_Fall_Day_mean,DeltaT_Fall_Night_mean
Karlsruhe [DEU],Germany,1.1,1.2,2.1,2.2,3.1,7.2,4.1,4.2
Mannheim [DEU],Germany,0.5,,1.5,1.6,NA,2.6,3.5,3.6
Berlin [DEU],Germany,-1,-2,-3,-4,-5,-6,-7,-8
,Nowhere,1,1,1,1,1,1,1,1
";

    fn sample() -> DeltaTTable {
        DeltaTTable::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_rows() {
        let table = sample();
        assert_eq!(table.len(), 4);
        let karlsruhe = &table.rows()[0];
        assert_eq!(karlsruhe.name.as_deref(), Some("Karlsruhe [DEU]"));
        assert_eq!(karlsruhe.value(DeltaTVariable::default()), Some(7.2));
        assert_eq!(karlsruhe.season_pair(Season::Winter), (Some(1.1), Some(1.2)));
    }

    #[test]
    fn test_empty_and_invalid_cells_are_absent() {
        let table = sample();
        let mannheim = &table.rows()[1];
        assert_eq!(mannheim.winter_night, None);
        assert_eq!(mannheim.summer_day, None);
        assert_eq!(mannheim.summer_night, Some(2.6));
        assert_eq!(table.rows()[3].name, None);
    }

    #[test]
    fn test_infinite_cells_are_absent() {
        let csv = "\
UC_NM_MN,DeltaT_Winter_Day_mean,DeltaT_Winter_Night_mean,DeltaT_Spring_Day_mean,DeltaT_Spring_Night_mean,DeltaT_Summer_Day_mean,DeltaT_Summer_Night_mean,DeltaT_Fall_Day_mean,DeltaT_Fall_Night_mean
X,inf,1,-infinity,2,NaN,3,4,5
";
        let table = DeltaTTable::from_reader(csv.as_bytes()).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.season_pair(Season::Winter), (None, Some(1.0)));
        assert_eq!(row.season_pair(Season::Spring), (None, Some(2.0)));
        assert_eq!(row.season_pair(Season::Summer), (None, Some(3.0)));
        assert_eq!(row.season_pair(Season::Fall), (Some(4.0), Some(5.0)));
    }

    #[test]
    fn test_region_names_sorted_and_distinct() {
        let mut rows = sample().rows().to_vec();
        rows.push(rows[0].clone());
        let table = DeltaTTable::new(rows);
        assert_eq!(table.region_names(), vec!["Berlin [DEU]", "Karlsruhe [DEU]", "Mannheim [DEU]"]);
    }

    #[test]
    fn test_filter_region_exact_match() {
        let table = sample();
        let rows = table.filter_region("Karlsruhe [DEU]");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], table.rows()[0]);

        assert!(table.filter_region("karlsruhe [DEU]").is_empty());
        assert!(table.filter_region("Karlsruhe [DEU] ").is_empty());
        assert!(table.filter_region("Atlantis").is_empty());
    }

    #[test]
    fn test_filter_region_passes_duplicates_through() {
        let mut rows = sample().rows().to_vec();
        let mut duplicate = rows[0].clone();
        duplicate.winter_day = Some(9.9);
        rows.push(duplicate);
        let table = DeltaTTable::new(rows);
        assert_eq!(table.filter_region("Karlsruhe [DEU]").len(), 2);
    }
}
