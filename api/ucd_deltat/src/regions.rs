use anyhow::{anyhow, Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use log::{debug, info};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::palette::{bucket_for, Bucket};
use crate::variable::DeltaTVariable;
use crate::REGION_NAME_FIELD;

/// Property added to every colored feature
pub const COLOR_FIELD: &str = "color";

/// Urban area polygon with its seasonal ΔT attributes, read-only after load
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
    pub properties: JsonObject,
}

impl Region {
    pub fn from_feature(feature: Feature) -> Self {
        let properties = feature.properties.unwrap_or_default();
        let name = properties
            .get(REGION_NAME_FIELD)
            .and_then(JsonValue::as_str)
            .map(str::to_owned);

        Self {
            name,
            geometry: feature.geometry,
            properties,
        }
    }

    /// Value of `variable`, absent when the key is missing, null, non-numeric or not finite
    pub fn value(&self, variable: DeltaTVariable) -> Option<f64> {
        self.properties
            .get(variable.key())
            .and_then(JsonValue::as_f64)
            .filter(|v| v.is_finite())
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Whether (lon, lat) lies inside the region's polygon(s)
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        geometry_contains(self.geometry.as_ref(), lon, lat)
    }
}

fn geometry_contains(geometry: Option<&Geometry>, lon: f64, lat: f64) -> bool {
    match geometry.map(|g| &g.value) {
        Some(Value::Polygon(rings)) => polygon_contains(rings, lon, lat),
        Some(Value::MultiPolygon(polygons)) => polygons.iter().any(|rings| polygon_contains(rings, lon, lat)),
        _ => false,
    }
}

/// Exterior ring minus holes
fn polygon_contains(rings: &[Vec<Vec<f64>>], lon: f64, lat: f64) -> bool {
    match rings.split_first() {
        Some((exterior, holes)) => {
            ring_contains(exterior, lon, lat) && !holes.iter().any(|hole| ring_contains(hole, lon, lat))
        }
        None => false,
    }
}

/// Ray-casting test; the ring is treated as closed whether or not the last
/// position repeats the first.
fn ring_contains(ring: &[Vec<f64>], px: f64, py: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = position(&ring[i]);
        let (xj, yj) = position(&ring[j]);
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn position(p: &[f64]) -> (f64, f64) {
    (p.first().copied().unwrap_or(f64::NAN), p.get(1).copied().unwrap_or(f64::NAN))
}

/// The static geometry dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionCollection {
    regions: Vec<Region>,
}

impl RegionCollection {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn from_geojson(geojson: GeoJson) -> Result<Self> {
        match geojson {
            GeoJson::FeatureCollection(collection) => Ok(Self::new(
                collection.features.into_iter().map(Region::from_feature).collect(),
            )),
            GeoJson::Feature(feature) => Ok(Self::new(vec![Region::from_feature(feature)])),
            GeoJson::Geometry(_) => Err(anyhow!("Expected a FeatureCollection, found a bare geometry")),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let geojson = GeoJson::from_reader(reader).context("Failed to parse GeoJSON")?;
        Self::from_geojson(geojson)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let collection = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to load regions from {}", path.display()))?;
        info!("Loaded {} regions from {}", collection.len(), path.display());
        Ok(collection)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// A region copy annotated with the display color for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredRegion {
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
    /// Copy of the source properties plus [`COLOR_FIELD`]
    pub properties: JsonObject,
    pub value: Option<f64>,
    pub bucket: Bucket,
}

impl ColoredRegion {
    fn derive(region: &Region, variable: DeltaTVariable) -> Self {
        let value = region.value(variable);
        let bucket = bucket_for(value);
        let mut properties = region.properties.clone();
        properties.insert(COLOR_FIELD.to_string(), JsonValue::from(bucket.hex()));

        Self {
            name: region.name.clone(),
            geometry: region.geometry.clone(),
            properties,
            value,
            bucket,
        }
    }

    pub fn color(&self) -> &'static str {
        self.bucket.hex()
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        geometry_contains(self.geometry.as_ref(), lon, lat)
    }

    /// Rings of each polygon, exterior first; empty for non-areal geometry
    pub fn polygons(&self) -> Vec<&[Vec<Vec<f64>>]> {
        match self.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Polygon(rings)) => vec![rings.as_slice()],
            Some(Value::MultiPolygon(polygons)) => polygons.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    pub fn to_feature(&self) -> Feature {
        Feature {
            bbox: None,
            geometry: self.geometry.clone(),
            id: None,
            properties: Some(self.properties.clone()),
            foreign_members: None,
        }
    }
}

/// Full colored replacement of the region set for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredRegions {
    pub variable: DeltaTVariable,
    pub regions: Vec<ColoredRegion>,
}

impl ColoredRegions {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Topmost region under (lon, lat); later features are drawn on top
    pub fn hit_test(&self, lon: f64, lat: f64) -> Option<&ColoredRegion> {
        self.regions.iter().rev().find(|r| r.contains(lon, lat))
    }

    /// Popup for whatever region lies under (lon, lat)
    pub fn popup_at(&self, lon: f64, lat: f64) -> Option<Popup> {
        self.hit_test(lon, lat).map(Popup::for_region)
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.regions.iter().map(ColoredRegion::to_feature).collect(),
            foreign_members: None,
        }
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_feature_collection())?)
    }
}

/// Derive the colored region set for `variable`. The source collection is only
/// borrowed, so repeated calls always start from the same static data.
pub fn colorize(regions: &RegionCollection, variable: DeltaTVariable) -> ColoredRegions {
    let colored: Vec<ColoredRegion> = regions
        .regions()
        .iter()
        .map(|region| ColoredRegion::derive(region, variable))
        .collect();

    let missing = colored.iter().filter(|r| r.value.is_none()).count();
    debug!("Colored {} regions for {} ({} without a value)", colored.len(), variable, missing);

    ColoredRegions { variable, regions: colored }
}

/// Click popup contents for one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub region: String,
    pub value: String,
}

impl Popup {
    pub fn for_region(region: &ColoredRegion) -> Self {
        Self {
            region: region.label().to_string(),
            value: format_value(region.value),
        }
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region: {}\nΔT Value: {}", self.region, self.value)
    }
}

/// Three decimals and a unit, or "N/A" when there is no value
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.3}°C", v),
        _ => "N/A".to_string(),
    }
}
