// Model exports
pub mod domain;
pub mod geojson;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, Coordinate, FacilityRecord, FilterCriteria, FilterOptions, FilterResult, DISPLAY_CAP, RADIUS_KM,
};
pub use requests::{FilterCriteriaRequest, ManualLocationRequest, SelectFacilityRequest};
pub use responses::{
    ErrorResponse, FacilityView, FilterResponse, FiltersResponse, HealthResponse, LocationStatusResponse,
    RiskResponse,
};
