// Route exports
pub mod facilities;
pub mod location;

use actix_web::web;

pub use facilities::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(facilities::configure)
            .configure(location::configure),
    );
}
