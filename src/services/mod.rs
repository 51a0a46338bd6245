// Service exports
pub mod cache;
pub mod dataset;
pub mod location;

pub use cache::{CacheStats, FilterCache, FilterCacheKey};
pub use dataset::{parse_feature_collection, DatasetError, DatasetLoader, DatasetState, FeatureRejection};
pub use location::{build_source, HttpLocationSource, StaticSource, UnsupportedSource};
