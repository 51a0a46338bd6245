use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{filter_options, LocationResolver, SessionAction, SessionController, HIGH_RISK_CRITERIA};
use crate::models::{
    ErrorResponse, FacilityView, FilterCriteria, FilterCriteriaRequest, FilterResponse, FiltersResponse,
    HealthResponse, RiskResponse, SelectFacilityRequest,
};
use crate::services::{DatasetState, FilterCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<DatasetState>,
    pub session: Arc<SessionController>,
    pub resolver: Arc<LocationResolver>,
    pub filters: Arc<FilterCache>,
}

impl AppState {
    fn filter_response(&self, criteria: &FilterCriteria) -> FilterResponse {
        let location = self.session.location().coordinate();
        let result = self.filters.filter(&self.dataset, criteria, location.as_ref());

        FilterResponse::new(
            &result,
            self.dataset.len(),
            location.as_ref(),
            self.filters.engine().classifier(),
        )
    }

    fn filters_response(&self) -> FiltersResponse {
        let state = self.session.snapshot();
        FiltersResponse {
            is_active: state.criteria.is_active(),
            criteria: state.criteria,
            selected_facility: state.selected_facility,
        }
    }
}

/// Configure facility, filter and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/risk", web::get().to(risk_reference))
        .route("/filters", web::get().to(get_filters))
        .route("/filters", web::put().to(set_filters))
        .route("/filters/clear", web::post().to(clear_filters))
        .route("/filters/radius/toggle", web::post().to(toggle_radius))
        .route("/filters/high-risk/toggle", web::post().to(toggle_high_risk))
        .route("/facilities", web::get().to(list_facilities))
        .route("/facilities/search", web::post().to(search_facilities))
        .route("/facilities/options", web::get().to(get_filter_options))
        .route("/facilities/select", web::post().to(select_facility))
        .route("/facilities/{id}", web::get().to(get_facility));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.dataset.is_available() { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_available: state.dataset.is_available(),
        dataset_count: state.dataset.len(),
        timestamp: chrono::Utc::now(),
    })
}

async fn risk_reference(state: web::Data<AppState>) -> impl Responder {
    let codes = state.filters.engine().classifier().codes();

    HttpResponse::Ok().json(RiskResponse {
        category_codes: codes.into_iter().map(String::from).collect(),
        criteria: HIGH_RISK_CRITERIA.to_string(),
    })
}

async fn get_filters(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.filters_response())
}

/// Replace the session's filter criteria
///
/// PUT /api/v1/filters
///
/// Request body:
/// ```json
/// {
///   "searchText": "string",
///   "categories": ["10100"],
///   "districts": ["string"],
///   "radiusOnly": false,
///   "highRiskOnly": false
/// }
/// ```
async fn set_filters(state: web::Data<AppState>, req: web::Json<FilterCriteriaRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    state
        .session
        .dispatch(SessionAction::SetCriteria(req.into_inner().into()));

    HttpResponse::Ok().json(state.filters_response())
}

async fn clear_filters(state: web::Data<AppState>) -> impl Responder {
    state.session.dispatch(SessionAction::ClearFilters);
    HttpResponse::Ok().json(state.filters_response())
}

async fn toggle_radius(state: web::Data<AppState>) -> impl Responder {
    state.session.dispatch(SessionAction::ToggleRadius);
    HttpResponse::Ok().json(state.filters_response())
}

async fn toggle_high_risk(state: web::Data<AppState>) -> impl Responder {
    state.session.dispatch(SessionAction::ToggleHighRisk);
    HttpResponse::Ok().json(state.filters_response())
}

/// Filtered facilities for the session's criteria and working coordinate
async fn list_facilities(state: web::Data<AppState>) -> impl Responder {
    let criteria = state.session.criteria();
    let response = state.filter_response(&criteria);

    tracing::debug!(
        "Returning {} of {} matching facilities",
        response.shown_count,
        response.total_count
    );

    HttpResponse::Ok().json(response)
}

/// Stateless filter pass with criteria supplied in the body
async fn search_facilities(state: web::Data<AppState>, req: web::Json<FilterCriteriaRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let criteria: FilterCriteria = req.into_inner().into();
    HttpResponse::Ok().json(state.filter_response(&criteria))
}

async fn get_filter_options(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(filter_options(state.dataset.records()))
}

async fn get_facility(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match state.dataset.find(&id) {
        Some(record) => {
            let location = state.session.location().coordinate();
            HttpResponse::Ok().json(FacilityView::new(
                record.clone(),
                location.as_ref(),
                state.filters.engine().classifier(),
            ))
        }
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "Facility not found".to_string(),
            message: format!("No facility with registration number {}", id),
            status_code: 404,
        }),
    }
}

/// Select a facility for the map and list, or clear the selection
async fn select_facility(state: web::Data<AppState>, req: web::Json<SelectFacilityRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if let Some(id) = &req.id {
        if state.dataset.find(id).is_none() {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Facility not found".to_string(),
                message: format!("No facility with registration number {}", id),
                status_code: 404,
            });
        }
    }

    state
        .session
        .dispatch(SessionAction::SelectFacility(req.into_inner().id));

    HttpResponse::Ok().json(state.filters_response())
}
