use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::config::{LocationSettings, LocationSourceKind};
use crate::core::location::{LocationError, LocationErrorKind, LocationSource, Position, PositionOptions};
use crate::models::Coordinate;

/// Environment with no location capability
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSource;

#[async_trait]
impl LocationSource for UnsupportedSource {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, LocationError> {
        Err(LocationError::new(
            LocationErrorKind::Unsupported,
            "no location source configured",
        ))
    }
}

/// A fixed, pre-configured device position
#[derive(Debug, Clone, Copy)]
pub struct StaticSource {
    coordinate: Coordinate,
    accuracy_m: f64,
}

impl StaticSource {
    pub fn new(coordinate: Coordinate, accuracy_m: f64) -> Self {
        Self { coordinate, accuracy_m }
    }
}

#[async_trait]
impl LocationSource for StaticSource {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, LocationError> {
        Ok(Position {
            coordinate: self.coordinate,
            accuracy_m: self.accuracy_m,
            timestamp: Utc::now(),
        })
    }
}

/// Fix payload returned by an HTTP location provider
#[derive(Debug, Deserialize)]
struct ProviderFix {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    longitude: f64,
    #[serde(default)]
    accuracy: Option<f64>,
}

/// Location provider reached over HTTP
///
/// Keeps the last fix and serves it again while it is younger than the
/// request's `maximum_age`.
pub struct HttpLocationSource {
    url: String,
    client: Client,
    last_fix: Mutex<Option<Position>>,
}

impl HttpLocationSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
            last_fix: Mutex::new(None),
        }
    }

    fn cached(&self, options: &PositionOptions) -> Option<Position> {
        let guard = self.last_fix.lock().ok()?;
        let fix = (*guard)?;
        let age = Utc::now().signed_duration_since(fix.timestamp).to_std().ok()?;

        (age <= options.maximum_age).then_some(fix)
    }

    fn remember(&self, position: Position) {
        if let Ok(mut guard) = self.last_fix.lock() {
            *guard = Some(position);
        }
    }

    async fn request(&self, options: &PositionOptions) -> Result<Position, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("highAccuracy", options.high_accuracy.to_string()),
                ("maximumAge", options.maximum_age.as_millis().to_string()),
            ])
            .timeout(options.timeout)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::new(
                classify_status(status),
                format!("location provider returned {}", status),
            ));
        }

        let fix: ProviderFix = response
            .json()
            .await
            .map_err(|e| LocationError::new(LocationErrorKind::Unknown, e.to_string()))?;

        let coordinate = Coordinate::new(fix.latitude, fix.longitude);
        if !coordinate.is_valid() {
            return Err(LocationError::new(
                LocationErrorKind::PositionUnavailable,
                format!("provider returned invalid coordinate {}", coordinate.format()),
            ));
        }

        Ok(Position {
            coordinate,
            accuracy_m: fix.accuracy.unwrap_or(0.0),
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl LocationSource for HttpLocationSource {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError> {
        if let Some(fix) = self.cached(options) {
            tracing::debug!("Using cached location fix from {}", fix.timestamp);
            return Ok(fix);
        }

        let position = self.request(options).await?;
        self.remember(position);
        Ok(position)
    }
}

fn classify_status(status: StatusCode) -> LocationErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LocationErrorKind::PermissionDenied,
        StatusCode::NOT_FOUND | StatusCode::SERVICE_UNAVAILABLE => LocationErrorKind::PositionUnavailable,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LocationErrorKind::Timeout,
        _ => LocationErrorKind::Unknown,
    }
}

fn classify_request_error(error: reqwest::Error) -> LocationError {
    let kind = if error.is_timeout() {
        LocationErrorKind::Timeout
    } else if error.is_connect() {
        LocationErrorKind::PositionUnavailable
    } else {
        LocationErrorKind::Unknown
    };
    LocationError::new(kind, error.to_string())
}

/// Build the configured device location source
///
/// Incomplete configuration degrades to [`UnsupportedSource`].
pub fn build_source(settings: &LocationSettings) -> Arc<dyn LocationSource> {
    match settings.source {
        LocationSourceKind::None => Arc::new(UnsupportedSource),
        LocationSourceKind::Static => match (settings.latitude, settings.longitude) {
            (Some(latitude), Some(longitude)) => Arc::new(StaticSource::new(
                Coordinate::new(latitude, longitude),
                settings.accuracy_m.unwrap_or(0.0),
            )),
            _ => {
                tracing::warn!("Static location source needs latitude and longitude, treating as unsupported");
                Arc::new(UnsupportedSource)
            }
        },
        LocationSourceKind::Http => match &settings.url {
            Some(url) => Arc::new(HttpLocationSource::new(url.clone())),
            None => {
                tracing::warn!("HTTP location source needs a url, treating as unsupported");
                Arc::new(UnsupportedSource)
            }
        },
    }
}
