use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::FilterEngine;
use crate::models::{Coordinate, FilterCriteria, FilterResult};
use crate::services::dataset::DatasetState;

/// Memoizing wrapper around [`FilterEngine`]
///
/// Results are keyed by everything a filter pass depends on, so a hit is
/// always identical to recomputing.
pub struct FilterCache {
    engine: FilterEngine,
    cache: Cache<FilterCacheKey, Arc<FilterResult>>,
}

/// Inputs of one filter pass
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterCacheKey {
    dataset_version: u64,
    criteria: FilterCriteria,
    location: Option<(u64, u64)>,
}

impl FilterCacheKey {
    /// The coordinate only takes part in the key when the radius flag is set
    pub fn new(dataset_version: u64, criteria: &FilterCriteria, location: Option<&Coordinate>) -> Self {
        let location = location
            .filter(|_| criteria.radius_only)
            .map(|c| (c.latitude.to_bits(), c.longitude.to_bits()));

        Self {
            dataset_version,
            criteria: criteria.clone(),
            location,
        }
    }
}

impl FilterCache {
    pub fn new(engine: FilterEngine, capacity: u64) -> Self {
        Self {
            engine,
            cache: Cache::new(capacity),
        }
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    /// Filter the dataset, reusing an earlier result for identical inputs
    pub fn filter(
        &self,
        dataset: &DatasetState,
        criteria: &FilterCriteria,
        location: Option<&Coordinate>,
    ) -> Arc<FilterResult> {
        let key = FilterCacheKey::new(dataset.version(), criteria, location);

        self.cache.get_with(key, || {
            tracing::trace!("Filter cache miss (dataset v{})", dataset.version());
            Arc::new(self.engine.filter(dataset.records(), criteria, location))
        })
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entries: self.cache.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
}
