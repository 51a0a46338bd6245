use std::collections::BTreeSet;

use crate::core::{
    distance::calculate_bounding_box,
    filters::{matches_category, matches_district, matches_high_risk, matches_radius, matches_search},
    risk::RiskClassifier,
};
use crate::models::{Coordinate, FacilityRecord, FilterCriteria, FilterOptions, FilterResult, DISPLAY_CAP, RADIUS_KM};

/// Narrows a facility dataset by the user's criteria
///
/// # Pipeline Stages
/// 1. Search text on name, owner and business description
/// 2. Category code membership
/// 3. District membership
/// 4. High-risk classification
/// 5. Radius around the working coordinate (skipped without one)
///
/// Stages are conjunctive and order only affects cost. The engine holds no
/// state between calls.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    classifier: RiskClassifier,
    display_cap: usize,
    radius_km: f64,
}

impl FilterEngine {
    pub fn new(classifier: RiskClassifier) -> Self {
        Self {
            classifier,
            display_cap: DISPLAY_CAP,
            radius_km: RADIUS_KM,
        }
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    pub fn display_cap(&self) -> usize {
        self.display_cap
    }

    /// Filter `dataset` against `criteria`
    ///
    /// # Arguments
    /// * `dataset` - Records in source order; empty when not loaded
    /// * `criteria` - Filter snapshot for this pass
    /// * `location` - Working coordinate, if one is resolved
    ///
    /// # Returns
    /// FilterResult with matches in dataset order, capped for display
    pub fn filter(
        &self,
        dataset: &[FacilityRecord],
        criteria: &FilterCriteria,
        location: Option<&Coordinate>,
    ) -> FilterResult {
        if dataset.is_empty() {
            return FilterResult::empty(self.display_cap);
        }

        let term = criteria.search_text.to_lowercase();
        let radius = if criteria.radius_only {
            location.map(|center| (center, calculate_bounding_box(center, self.radius_km)))
        } else {
            None
        };

        let mut total_count = 0;
        let mut records = Vec::with_capacity(self.display_cap.min(dataset.len()));

        let matching = dataset
            .iter()
            .filter(|record| matches_search(record, &term))
            .filter(|record| matches_category(record, &criteria.categories))
            .filter(|record| matches_district(record, &criteria.districts))
            .filter(|record| !criteria.high_risk_only || matches_high_risk(record, &self.classifier))
            .filter(|record| match &radius {
                Some((center, bbox)) => matches_radius(record, center, bbox, self.radius_km),
                None => true,
            });

        for record in matching {
            total_count += 1;
            if records.len() < self.display_cap {
                records.push(record.clone());
            }
        }

        tracing::trace!(
            "Filter pass: {} of {} records matched, {} returned",
            total_count,
            dataset.len(),
            records.len()
        );

        FilterResult {
            records,
            total_count,
            display_cap: self.display_cap,
        }
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(RiskClassifier::default())
    }
}

/// Sorted distinct category codes and districts present in `dataset`
pub fn filter_options(dataset: &[FacilityRecord]) -> FilterOptions {
    let categories: BTreeSet<&str> = dataset
        .iter()
        .map(|r| r.category_code.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    let districts: BTreeSet<&str> = dataset
        .iter()
        .map(|r| r.district.as_str())
        .filter(|d| !d.is_empty())
        .collect();

    FilterOptions {
        categories: categories.into_iter().map(String::from).collect(),
        districts: districts.into_iter().map(String::from).collect(),
    }
}
