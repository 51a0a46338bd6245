use std::collections::BTreeSet;

use crate::core::distance::{approximate_distance, is_within_bounding_box};
use crate::core::risk::RiskClassifier;
use crate::models::{BoundingBox, Coordinate, FacilityRecord};

/// Case-insensitive substring match on name, owner or business description
///
/// `term_lower` must already be lowercased.
#[inline]
pub fn matches_search(record: &FacilityRecord, term_lower: &str) -> bool {
    if term_lower.is_empty() {
        return true;
    }

    record.name.to_lowercase().contains(term_lower)
        || record.owner.to_lowercase().contains(term_lower)
        || record.business_description.to_lowercase().contains(term_lower)
}

/// Category code must be selected, unless nothing is selected
#[inline]
pub fn matches_category(record: &FacilityRecord, categories: &BTreeSet<String>) -> bool {
    categories.is_empty() || categories.contains(&record.category_code)
}

/// District must be selected, unless nothing is selected
#[inline]
pub fn matches_district(record: &FacilityRecord, districts: &BTreeSet<String>) -> bool {
    districts.is_empty() || districts.contains(&record.district)
}

#[inline]
pub fn matches_high_risk(record: &FacilityRecord, classifier: &RiskClassifier) -> bool {
    classifier.is_high_risk(&record.category_code)
}

/// Planar-metric radius check with a bounding box short-circuit
#[inline]
pub fn matches_radius(
    record: &FacilityRecord,
    center: &Coordinate,
    bbox: &BoundingBox,
    radius_km: f64,
) -> bool {
    if !is_within_bounding_box(&record.location, bbox) {
        return false;
    }

    approximate_distance(center, &record.location) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::calculate_bounding_box;

    fn create_test_record(category: &str, district: &str, lat: f64, lon: f64) -> FacilityRecord {
        FacilityRecord {
            id: "3-1-1/25ปจ".to_string(),
            name: "Prachin Rice Mill".to_string(),
            owner: "บริษัท ข้าวดี จำกัด".to_string(),
            business_description: "Milling rice".to_string(),
            investment: Some(5_000_000.0),
            employees: Some(40),
            horsepower: Some(250.0),
            kilowatts: None,
            category_code: category.to_string(),
            district: district.to_string(),
            address: "Moo 3".to_string(),
            phone: None,
            location: Coordinate::new(lat, lon),
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let record = create_test_record("10100", "เมือง", 14.05, 101.36);

        assert!(matches_search(&record, "rice"));
        assert!(matches_search(&record, "milling"));
        assert!(matches_search(&record, "ข้าวดี"));
        assert!(!matches_search(&record, "steel"));
    }

    #[test]
    fn test_search_ignores_other_fields() {
        let record = create_test_record("10100", "เมือง", 14.05, 101.36);

        assert!(!matches_search(&record, "moo 3"));
        assert!(!matches_search(&record, "10100"));
    }

    #[test]
    fn test_category_and_district_sets() {
        let record = create_test_record("10100", "กบินทร์บุรี", 14.05, 101.36);

        assert!(matches_category(&record, &BTreeSet::new()));
        assert!(matches_category(&record, &set(&["10100", "20000"])));
        assert!(!matches_category(&record, &set(&["20000"])));

        assert!(matches_district(&record, &BTreeSet::new()));
        assert!(matches_district(&record, &set(&["กบินทร์บุรี"])));
        assert!(!matches_district(&record, &set(&["เมือง"])));
    }

    #[test]
    fn test_high_risk() {
        let classifier = RiskClassifier::default();

        assert!(matches_high_risk(&create_test_record("10100", "", 0.0, 0.0), &classifier));
        assert!(!matches_high_risk(&create_test_record("99999", "", 0.0, 0.0), &classifier));
    }

    #[test]
    fn test_radius_boundary() {
        let center = Coordinate::new(14.0504, 101.3678);
        let bbox = calculate_bounding_box(&center, 10.0);

        let near = create_test_record("10100", "", 14.0504, 101.4178);
        let far = create_test_record("10100", "", 14.0504, 101.4678);

        assert!(matches_radius(&near, &center, &bbox, 10.0));
        assert!(!matches_radius(&far, &center, &bbox, 10.0));
    }

    #[test]
    fn test_radius_includes_exact_boundary() {
        let center = Coordinate::new(-0.0759999999999934, -170.0);
        let bbox = calculate_bounding_box(&center, 10.0);
        let edge = create_test_record("10100", "", 0.014090090090096681, -170.0);

        assert_eq!(approximate_distance(&center, &edge.location), 10.0);
        assert!(matches_radius(&edge, &center, &bbox, 10.0));
    }

    #[test]
    fn test_radius_agrees_with_metric_around_box_edges() {
        let center = Coordinate::new(14.0504, 101.3678);
        let bbox = calculate_bounding_box(&center, 10.0);
        let delta = 10.0 / 111.0;

        for step in -4..=4 {
            let offset = delta + step as f64 * f64::EPSILON;
            for (lat, lon) in [
                (center.latitude + offset, center.longitude),
                (center.latitude - offset, center.longitude),
                (center.latitude, center.longitude + offset),
                (center.latitude, center.longitude - offset),
            ] {
                let record = create_test_record("10100", "", lat, lon);
                let by_metric = approximate_distance(&center, &record.location) <= 10.0;
                assert_eq!(matches_radius(&record, &center, &bbox, 10.0), by_metric, "({}, {})", lat, lon);
            }
        }
    }

    #[test]
    fn test_radius_corner_inside_box_outside_circle() {
        let center = Coordinate::new(0.0, 0.0);
        let bbox = calculate_bounding_box(&center, 10.0);
        let delta = 0.085;
        let corner = create_test_record("10100", "", delta, delta);

        assert!(is_within_bounding_box(&corner.location, &bbox));
        assert!(!matches_radius(&corner, &center, &bbox, 10.0));
    }
}
