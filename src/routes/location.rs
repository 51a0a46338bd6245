use actix_web::{web, HttpResponse, Responder};

use crate::models::{LocationStatusResponse, ManualLocationRequest};
use crate::routes::facilities::AppState;

/// Configure location routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/location", web::get().to(get_location))
        .route("/location/manual", web::post().to(set_manual_location));
}

async fn get_location(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(LocationStatusResponse::from(state.resolver.state()))
}

/// Manual location override
///
/// POST /api/v1/location/manual
///
/// Request body:
/// ```json
/// {
///   "latitude": "14.0504",
///   "longitude": "101.3678"
/// }
/// ```
///
/// Input that does not parse leaves the location unchanged; the response
/// carries the current status either way.
async fn set_manual_location(state: web::Data<AppState>, req: web::Json<ManualLocationRequest>) -> impl Responder {
    let location = state.resolver.set_manual(&req.latitude, &req.longitude);
    HttpResponse::Ok().json(LocationStatusResponse::from(location))
}
