use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tokio::sync::watch;

use crate::core::location::{LocationEvent, LocationState};
use crate::models::FilterCriteria;

/// Everything the presentation layer reads for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub location: LocationState,
    pub criteria: FilterCriteria,
    #[serde(rename = "selectedFacility")]
    pub selected_facility: Option<String>,
}

/// Transitions of [`SessionState`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SetSearchText(String),
    SetCategories(BTreeSet<String>),
    SetDistricts(BTreeSet<String>),
    ToggleRadius,
    ToggleHighRisk,
    SetCriteria(FilterCriteria),
    ClearFilters,
    SelectFacility(Option<String>),
    Location(LocationEvent),
}

impl SessionState {
    /// Pure reducer
    pub fn reduce(mut self, action: SessionAction) -> Self {
        match action {
            SessionAction::SetSearchText(text) => self.criteria.search_text = text,
            SessionAction::SetCategories(categories) => self.criteria.categories = categories,
            SessionAction::SetDistricts(districts) => self.criteria.districts = districts,
            SessionAction::ToggleRadius => self.criteria.radius_only = !self.criteria.radius_only,
            SessionAction::ToggleHighRisk => self.criteria.high_risk_only = !self.criteria.high_risk_only,
            SessionAction::SetCriteria(criteria) => self.criteria = criteria,
            SessionAction::ClearFilters => self.criteria = FilterCriteria::default(),
            SessionAction::SelectFacility(id) => self.selected_facility = id,
            SessionAction::Location(event) => self.location = self.location.apply(event),
        }
        self
    }
}

/// Single owner of the session state
///
/// Transitions replace the whole value under the channel's lock, so
/// concurrent writers resolve as last-write-wins. Subscribers are notified
/// only when a transition actually changes the state.
#[derive(Debug)]
pub struct SessionController {
    state: watch::Sender<SessionState>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    pub fn with_state(initial: SessionState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    /// Apply `action` and return the state it produced
    ///
    /// The returned value is captured under the channel's lock, so a
    /// concurrent writer cannot leak its own transition into the result.
    pub fn dispatch(&self, action: SessionAction) -> SessionState {
        let mut produced = SessionState::default();
        self.state.send_if_modified(|current| {
            let next = current.clone().reduce(action);
            let changed = next != *current;
            if changed {
                *current = next.clone();
            }
            produced = next;
            changed
        });
        produced
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn location(&self) -> LocationState {
        self.state.borrow().location
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.state.borrow().criteria.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    #[test]
    fn test_toggles_flip_flags() {
        let state = SessionState::default()
            .reduce(SessionAction::ToggleRadius)
            .reduce(SessionAction::ToggleHighRisk)
            .reduce(SessionAction::ToggleRadius);

        assert!(!state.criteria.radius_only);
        assert!(state.criteria.high_risk_only);
    }

    #[test]
    fn test_clear_filters_keeps_location_and_selection() {
        let coordinate = Coordinate::new(14.0, 101.0);
        let state = SessionState::default()
            .reduce(SessionAction::Location(LocationEvent::ManualOverride(coordinate)))
            .reduce(SessionAction::SetSearchText("mill".to_string()))
            .reduce(SessionAction::SelectFacility(Some("42".to_string())))
            .reduce(SessionAction::ClearFilters);

        assert_eq!(state.criteria, FilterCriteria::default());
        assert_eq!(state.location.coordinate(), Some(coordinate));
        assert_eq!(state.selected_facility.as_deref(), Some("42"));
    }

    #[test]
    fn test_filter_actions_leave_location_alone() {
        let state = SessionState::default()
            .reduce(SessionAction::SetCategories(["10100".to_string()].into_iter().collect()));

        assert_eq!(state.location, LocationState::Idle);
    }

    #[tokio::test]
    async fn test_controller_notifies_only_on_change() {
        let controller = SessionController::new();
        let mut rx = controller.subscribe();

        controller.dispatch(SessionAction::ClearFilters);
        assert!(!rx.has_changed().unwrap());

        controller.dispatch(SessionAction::ToggleHighRisk);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().criteria.high_risk_only);
    }

    #[test]
    fn test_dispatch_returns_own_transition_under_contention() {
        let controller = std::sync::Arc::new(SessionController::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let controller = controller.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let text = format!("w{}-{}", worker, i);
                        let state = controller.dispatch(SessionAction::SetSearchText(text.clone()));
                        assert_eq!(state.criteria.search_text, text);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
