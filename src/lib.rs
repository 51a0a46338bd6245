//! Nearby Factories - location resolution and facility filtering engine
//!
//! This library establishes a working user coordinate under unreliable
//! location sources and narrows a geolocated facility dataset by search
//! text, category, district, risk class and radius.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    distance::{approximate_distance, haversine_distance},
    FilterEngine, LocationResolver, LocationState, RiskClassifier, SessionController,
};
pub use models::{Coordinate, FacilityRecord, FilterCriteria, FilterResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let center = Coordinate::new(14.0504, 101.3678);
        assert_eq!(haversine_distance(&center, &center), 0.0);
        assert_eq!(approximate_distance(&center, &center), 0.0);
    }
}
