use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::FilterCriteria;

/// Request to replace the session's filter criteria
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FilterCriteriaRequest {
    #[validate(length(max = 200))]
    #[serde(alias = "search_text", rename = "searchText", default)]
    pub search_text: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub districts: Vec<String>,
    #[serde(alias = "radius_only", rename = "radiusOnly", default)]
    pub radius_only: bool,
    #[serde(alias = "high_risk_only", rename = "highRiskOnly", default)]
    pub high_risk_only: bool,
}

impl From<FilterCriteriaRequest> for FilterCriteria {
    fn from(req: FilterCriteriaRequest) -> Self {
        Self {
            search_text: req.search_text,
            categories: req.categories.into_iter().collect(),
            districts: req.districts.into_iter().collect(),
            radius_only: req.radius_only,
            high_risk_only: req.high_risk_only,
        }
    }
}

/// Manual location entry, exactly as typed into the two text fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualLocationRequest {
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

/// Select a facility, or clear the selection with `null`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SelectFacilityRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub id: Option<String>,
}
