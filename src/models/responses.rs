use serde::{Deserialize, Serialize};

use crate::core::distance::{format_distance, haversine_distance};
use crate::core::location::{LocationErrorKind, LocationState};
use crate::core::risk::RiskClassifier;
use crate::models::domain::{Coordinate, FacilityRecord, FilterCriteria, FilterResult};

/// A facility prepared for a list card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityView {
    #[serde(flatten)]
    pub facility: FacilityRecord,
    /// Great-circle distance from the working coordinate
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "distanceLabel")]
    pub distance_label: Option<String>,
    #[serde(rename = "isHighRisk")]
    pub is_high_risk: bool,
}

impl FacilityView {
    pub fn new(facility: FacilityRecord, location: Option<&Coordinate>, classifier: &RiskClassifier) -> Self {
        let distance_km = location.map(|here| haversine_distance(here, &facility.location));

        Self {
            is_high_risk: classifier.is_high_risk(&facility.category_code),
            distance_label: distance_km.map(format_distance),
            distance_km,
            facility,
        }
    }
}

/// Response for the facility list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResponse {
    pub facilities: Vec<FacilityView>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    #[serde(rename = "shownCount")]
    pub shown_count: usize,
    #[serde(rename = "datasetCount")]
    pub dataset_count: usize,
    #[serde(rename = "displayCap")]
    pub display_cap: usize,
    pub truncated: bool,
}

impl FilterResponse {
    pub fn new(
        result: &FilterResult,
        dataset_count: usize,
        location: Option<&Coordinate>,
        classifier: &RiskClassifier,
    ) -> Self {
        let facilities: Vec<FacilityView> = result
            .records
            .iter()
            .cloned()
            .map(|record| FacilityView::new(record, location, classifier))
            .collect();

        Self {
            shown_count: facilities.len(),
            facilities,
            total_count: result.total_count,
            dataset_count,
            display_cap: result.display_cap,
            truncated: result.is_truncated(),
        }
    }
}

/// Location status for the status banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationStatusResponse {
    pub status: String,
    #[serde(rename = "isLoading")]
    pub is_loading: bool,
    pub coordinate: Option<Coordinate>,
    /// Four-decimal `lat, lng` text
    pub display: Option<String>,
    #[serde(rename = "errorKind")]
    pub error_kind: Option<LocationErrorKind>,
    pub error: Option<String>,
}

impl From<LocationState> for LocationStatusResponse {
    fn from(state: LocationState) -> Self {
        let coordinate = state.coordinate();
        Self {
            status: state.status().to_string(),
            is_loading: state.is_loading(),
            display: coordinate.map(|c| c.format()),
            coordinate,
            error_kind: state.error(),
            error: state.error_message().map(String::from),
        }
    }
}

/// Current filters plus selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub criteria: FilterCriteria,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "selectedFacility")]
    pub selected_facility: Option<String>,
}

/// High-risk classification reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskResponse {
    #[serde(rename = "categoryCodes")]
    pub category_codes: Vec<String>,
    pub criteria: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "datasetAvailable")]
    pub dataset_available: bool,
    #[serde(rename = "datasetCount")]
    pub dataset_count: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
