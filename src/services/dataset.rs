use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::geojson::{Feature, FeatureCollection};
use crate::models::{Coordinate, FacilityRecord};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Errors that can occur while loading the facility dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Dataset source returned status {0}")]
    Status(u16),

    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),
}

/// Why a single feature was left out of the dataset
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureRejection {
    #[error("feature has no registration number")]
    MissingId,

    #[error("feature {0} has no point geometry")]
    NotAPoint(String),

    #[error("feature {id} has out-of-range coordinates ({latitude}, {longitude})")]
    OutOfRange { id: String, latitude: f64, longitude: f64 },

    #[error("duplicate registration number {0}")]
    Duplicate(String),
}

/// The facility dataset as seen by the rest of the system
#[derive(Debug, Clone, Default)]
pub enum DatasetState {
    /// Not loaded, or the load failed; filters see an empty dataset
    #[default]
    Unavailable,
    Loaded {
        records: Arc<[FacilityRecord]>,
        version: u64,
        loaded_at: DateTime<Utc>,
    },
}

impl DatasetState {
    pub fn loaded(records: Vec<FacilityRecord>) -> Self {
        Self::Loaded {
            records: records.into(),
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[FacilityRecord] {
        match self {
            Self::Unavailable => &[],
            Self::Loaded { records, .. } => &records[..],
        }
    }

    /// Changes whenever a new snapshot is loaded; 0 while unavailable
    pub fn version(&self) -> u64 {
        match self {
            Self::Unavailable => 0,
            Self::Loaded { version, .. } => *version,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&FacilityRecord> {
        self.records().iter().find(|r| r.id == id)
    }
}

/// Fetches the facility GeoJSON from a file path or an http(s) URL
pub struct DatasetLoader {
    source: String,
    client: Client,
}

impl DatasetLoader {
    pub fn new(source: impl Into<String>, request_timeout: Duration) -> Result<Self, DatasetError> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            source: source.into(),
            client,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    /// Fetch and parse the dataset
    pub async fn fetch(&self) -> Result<Vec<FacilityRecord>, DatasetError> {
        let bytes = if self.is_remote() {
            tracing::debug!("Fetching dataset from: {}", self.source);
            let response = self.client.get(&self.source).send().await?;

            if !response.status().is_success() {
                return Err(DatasetError::Status(response.status().as_u16()));
            }
            response.bytes().await?.to_vec()
        } else {
            tracing::debug!("Reading dataset from: {}", self.source);
            tokio::fs::read(&self.source).await?
        };

        parse_feature_collection(&bytes)
    }

    /// Fetch the dataset, degrading to `Unavailable` on any failure
    pub async fn load(&self) -> DatasetState {
        match self.fetch().await {
            Ok(records) => {
                tracing::info!("Loaded {} facilities from {}", records.len(), self.source);
                DatasetState::loaded(records)
            }
            Err(e) => {
                tracing::error!("Error loading facilities from {}: {}", self.source, e);
                DatasetState::Unavailable
            }
        }
    }
}

/// Parse a GeoJSON feature collection into facility records
///
/// Features that break the record invariants are skipped with a warning.
pub fn parse_feature_collection(bytes: &[u8]) -> Result<Vec<FacilityRecord>, DatasetError> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)?;

    if collection.kind != "FeatureCollection" {
        return Err(DatasetError::InvalidFormat(format!(
            "expected FeatureCollection, found {}",
            collection.kind
        )));
    }

    let mut seen = HashSet::with_capacity(collection.features.len());
    let mut records = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let record = match into_record(feature) {
            Ok(record) => record,
            Err(rejection) => {
                tracing::warn!("Skipping feature: {}", rejection);
                continue;
            }
        };

        if !seen.insert(record.id.clone()) {
            tracing::warn!("Skipping feature: {}", FeatureRejection::Duplicate(record.id));
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

/// Convert one feature, normalizing `[lng, lat]` into a [`Coordinate`]
pub fn into_record(feature: Feature) -> Result<FacilityRecord, FeatureRejection> {
    let props = feature.properties;

    if props.registration_id.is_empty() {
        return Err(FeatureRejection::MissingId);
    }

    let point = feature
        .geometry
        .as_ref()
        .and_then(|g| g.point())
        .ok_or_else(|| FeatureRejection::NotAPoint(props.registration_id.clone()))?;
    let location = Coordinate::from(point);

    if !location.is_valid() {
        return Err(FeatureRejection::OutOfRange {
            id: props.registration_id,
            latitude: location.latitude,
            longitude: location.longitude,
        });
    }

    Ok(FacilityRecord {
        id: props.registration_id,
        name: props.name,
        owner: props.owner,
        business_description: props.business,
        investment: props.investment,
        employees: props.employees.filter(|n| *n >= 0.0).map(|n| n.round() as u32),
        horsepower: props.hp,
        kilowatts: props.kw,
        category_code: props.category,
        district: props.district,
        address: props.address,
        phone: Some(props.phone).filter(|p| !p.is_empty()),
        location,
    })
}
