// Core algorithm exports
pub mod distance;
pub mod engine;
pub mod filters;
pub mod location;
pub mod resolver;
pub mod risk;
pub mod session;

pub use distance::{approximate_distance, calculate_bounding_box, format_distance, haversine_distance, is_within_bounding_box};
pub use engine::{filter_options, FilterEngine};
pub use filters::{matches_category, matches_district, matches_high_risk, matches_radius, matches_search};
pub use location::{
    parse_manual_coordinate, LocationError, LocationErrorKind, LocationEvent, LocationSource, LocationState,
    ManualInputError, Position, PositionOptions, FALLBACK_COORDINATE,
};
pub use resolver::LocationResolver;
pub use risk::{is_high_risk, RiskClassifier, HIGH_RISK_CATEGORY_CODES, HIGH_RISK_CRITERIA};
pub use session::{SessionAction, SessionController, SessionState};
