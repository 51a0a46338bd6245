use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::location::{
    parse_manual_coordinate, LocationErrorKind, LocationEvent, LocationSource, LocationState, PositionOptions,
    FALLBACK_COORDINATE,
};
use crate::core::session::{SessionAction, SessionController};
use crate::models::Coordinate;

/// Produces the session's working coordinate
///
/// Queries the device source at most once per session. Any failure settles
/// on the fallback coordinate; manual overrides may follow at any time.
pub struct LocationResolver {
    source: Arc<dyn LocationSource>,
    options: PositionOptions,
    fallback: Coordinate,
    session: Arc<SessionController>,
    requested: AtomicBool,
}

impl LocationResolver {
    pub fn new(source: Arc<dyn LocationSource>, session: Arc<SessionController>) -> Self {
        Self {
            source,
            options: PositionOptions::default(),
            fallback: FALLBACK_COORDINATE,
            session,
            requested: AtomicBool::new(false),
        }
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn state(&self) -> LocationState {
        self.session.location()
    }

    /// Run the one-shot device request
    ///
    /// Later calls return the current state without touching the source.
    pub async fn resolve(&self) -> LocationState {
        if self.requested.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        self.session
            .dispatch(SessionAction::Location(LocationEvent::RequestStarted));
        tracing::info!(
            "Requesting device location (high accuracy: {}, timeout: {:?}, max age: {:?})",
            self.options.high_accuracy,
            self.options.timeout,
            self.options.maximum_age
        );

        let outcome = tokio::time::timeout(self.options.timeout, self.source.current_position(&self.options)).await;

        let event = match outcome {
            Ok(Ok(position)) => {
                tracing::info!(
                    "Location obtained: {} (accuracy {:.0} m)",
                    position.coordinate.format(),
                    position.accuracy_m
                );
                LocationEvent::FixObtained(position.coordinate)
            }
            Ok(Err(e)) => {
                tracing::warn!("Location request failed: {}", e);
                self.fall_back(e.kind)
            }
            Err(_) => {
                tracing::warn!("Location request timed out after {:?}", self.options.timeout);
                self.fall_back(LocationErrorKind::Timeout)
            }
        };

        self.session.dispatch(SessionAction::Location(event)).location
    }

    fn fall_back(&self, error: LocationErrorKind) -> LocationEvent {
        tracing::info!("Using fallback location ({})", self.fallback.format());
        LocationEvent::FellBack {
            coordinate: self.fallback,
            error,
        }
    }

    /// Adopt a manually entered coordinate
    ///
    /// Unparseable input leaves the state untouched and is not reported.
    pub fn set_manual(&self, latitude: &str, longitude: &str) -> LocationState {
        match parse_manual_coordinate(latitude, longitude) {
            Ok(coordinate) => self.set_manual_coordinate(coordinate),
            Err(e) => {
                tracing::debug!("Ignoring manual location input: {}", e);
                self.state()
            }
        }
    }

    pub fn set_manual_coordinate(&self, coordinate: Coordinate) -> LocationState {
        tracing::info!("Manual location set: {}", coordinate.format());
        self.session
            .dispatch(SessionAction::Location(LocationEvent::ManualOverride(coordinate)))
            .location
    }
}
