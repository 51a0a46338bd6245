//! Working-coordinate state machine.
//!
//! [`LocationState`] is advanced only through [`LocationState::apply`], a
//! pure reducer over [`LocationEvent`]s. The [`LocationResolver`] is the
//! only producer of those events.
//!
//! [`LocationResolver`]: crate::core::resolver::LocationResolver

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::Coordinate;

/// Regional center substituted whenever the device location is unavailable
pub const FALLBACK_COORDINATE: Coordinate = Coordinate::new(14.0504, 101.3678);

/// Classified reason a location request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationErrorKind {
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl LocationErrorKind {
    /// Localized message for passive display
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unsupported => "เบราว์เซอร์ไม่รองรับการระบุตำแหน่ง",
            Self::PermissionDenied => {
                "การเข้าถึงตำแหน่งถูกปฏิเสธ กรุณาอนุญาตในการตั้งค่าเบราว์เซอร์"
            }
            Self::PositionUnavailable => "ไม่สามารถระบุตำแหน่งได้ในขณะนี้",
            Self::Timeout => "หมดเวลาในการระบุตำแหน่ง",
            Self::Unknown => "เกิดข้อผิดพลาดในการระบุตำแหน่ง",
        }
    }
}

/// Typed failure returned by a [`LocationSource`]
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {detail}")]
pub struct LocationError {
    pub kind: LocationErrorKind,
    pub detail: String,
}

impl LocationError {
    pub fn new(kind: LocationErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<LocationErrorKind> for LocationError {
    fn from(kind: LocationErrorKind) -> Self {
        Self::new(kind, kind.message())
    }
}

/// Why manual input was not accepted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManualInputError {
    #[error("latitude is not a finite number: {0:?}")]
    Latitude(String),

    #[error("longitude is not a finite number: {0:?}")]
    Longitude(String),
}

/// Parse the two manual text fields into a coordinate
///
/// Both values must parse as finite floats. No range check is applied.
pub fn parse_manual_coordinate(latitude: &str, longitude: &str) -> Result<Coordinate, ManualInputError> {
    let lat = parse_finite(latitude).ok_or_else(|| ManualInputError::Latitude(latitude.to_string()))?;
    let lng = parse_finite(longitude).ok_or_else(|| ManualInputError::Longitude(longitude.to_string()))?;

    Ok(Coordinate::new(lat, lng))
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Options passed to the device location source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the source may return
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(10_000),
            maximum_age: Duration::from_millis(300_000),
        }
    }
}

/// A fix reported by a location source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Accuracy radius in meters
    pub accuracy_m: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Device location source, queried once per session
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError>;
}

/// Session location lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LocationState {
    #[default]
    Idle,
    Requesting,
    Resolved { coordinate: Coordinate },
    Fallback { coordinate: Coordinate, error: LocationErrorKind },
    ManualOverride { coordinate: Coordinate },
}

/// Inputs to the location reducer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEvent {
    RequestStarted,
    FixObtained(Coordinate),
    FellBack { coordinate: Coordinate, error: LocationErrorKind },
    ManualOverride(Coordinate),
}

impl LocationState {
    /// Pure transition function
    ///
    /// - `RequestStarted` only leaves `Idle`
    /// - request outcomes are dropped while `Idle` and otherwise replace the
    ///   current state, so the last completed resolution wins
    /// - manual overrides apply from any state
    pub fn apply(self, event: LocationEvent) -> Self {
        match (self, event) {
            (Self::Idle, LocationEvent::RequestStarted) => Self::Requesting,
            (state, LocationEvent::RequestStarted) => state,
            (Self::Idle, LocationEvent::FixObtained(_) | LocationEvent::FellBack { .. }) => Self::Idle,
            (_, LocationEvent::FixObtained(coordinate)) => Self::Resolved { coordinate },
            (_, LocationEvent::FellBack { coordinate, error }) => Self::Fallback { coordinate, error },
            (_, LocationEvent::ManualOverride(coordinate)) => Self::ManualOverride { coordinate },
        }
    }

    /// The working coordinate, once any resolution has completed
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Idle | Self::Requesting => None,
            Self::Resolved { coordinate }
            | Self::Fallback { coordinate, .. }
            | Self::ManualOverride { coordinate } => Some(*coordinate),
        }
    }

    pub fn error(&self) -> Option<LocationErrorKind> {
        match self {
            Self::Fallback { error, .. } => Some(*error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error().map(|kind| kind.message())
    }

    /// True until the first resolution completes
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Requesting)
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Resolved { .. } => "resolved",
            Self::Fallback { .. } => "fallback",
            Self::ManualOverride { .. } => "manualOverride",
        }
    }
}
