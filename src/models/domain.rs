use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of filtered records returned for rendering in one pass
pub const DISPLAY_CAP: usize = 20;

/// Radius used by the "nearby only" filter, in kilometers
pub const RADIUS_KM: f64 = 10.0;

/// Geographic point with an explicit axis order
///
/// The dataset stores `[longitude, latitude]`; everything inside the crate
/// works with this struct so the two axes can never be swapped silently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both axes are inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Four-decimal display form, `lat, lng`
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(point: geo::Point<f64>) -> Self {
        // geo points are (x, y) = (longitude, latitude)
        Self::new(point.y(), point.x())
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

/// One registered facility from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: String,
    pub name: String,
    pub owner: String,
    #[serde(rename = "businessDescription")]
    pub business_description: String,
    pub investment: Option<f64>,
    pub employees: Option<u32>,
    pub horsepower: Option<f64>,
    pub kilowatts: Option<f64>,
    #[serde(rename = "categoryCode")]
    pub category_code: String,
    pub district: String,
    pub address: String,
    pub phone: Option<String>,
    pub location: Coordinate,
}

/// Snapshot of the user-selected filters consumed by one filter pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "searchText", default)]
    pub search_text: String,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub districts: BTreeSet<String>,
    #[serde(rename = "radiusOnly", default)]
    pub radius_only: bool,
    #[serde(rename = "highRiskOnly", default)]
    pub high_risk_only: bool,
}

impl FilterCriteria {
    /// Whether any filter would narrow the dataset
    pub fn is_active(&self) -> bool {
        !self.search_text.is_empty()
            || !self.categories.is_empty()
            || !self.districts.is_empty()
            || self.radius_only
            || self.high_risk_only
    }
}

/// Output of one filter pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult {
    /// Matching records in dataset order, at most `display_cap` of them
    pub records: Vec<FacilityRecord>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    #[serde(rename = "displayCap")]
    pub display_cap: usize,
}

impl FilterResult {
    pub fn empty(display_cap: usize) -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
            display_cap,
        }
    }

    /// True when more records matched than are returned
    pub fn is_truncated(&self) -> bool {
        self.total_count > self.records.len()
    }
}

/// Axis-aligned box in degree space
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Distinct values present in the dataset, for selection widgets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub districts: Vec<String>,
}
