use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use nearby_factories::config::{LoggingSettings, Settings};
use nearby_factories::core::{FilterEngine, LocationResolver, SessionController};
use nearby_factories::routes::{self, AppState};
use nearby_factories::services::{build_source, DatasetLoader, DatasetState, FilterCache};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path payload errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);
    info!("Starting Nearby Factories...");

    // Load the dataset once; failure leaves it unavailable
    let dataset = match DatasetLoader::new(
        settings.dataset.source.clone(),
        Duration::from_secs(settings.dataset.request_timeout_secs),
    ) {
        Ok(loader) => loader.load().await,
        Err(e) => {
            error!("Failed to create dataset loader: {}", e);
            DatasetState::Unavailable
        }
    };

    // Resolve the working coordinate in the background
    let session = Arc::new(SessionController::new());
    let resolver = Arc::new(
        LocationResolver::new(build_source(&settings.location), session.clone())
            .with_options(settings.location.position_options())
            .with_fallback(settings.location.fallback()),
    );

    let startup_resolver = resolver.clone();
    actix_web::rt::spawn(async move {
        let state = startup_resolver.resolve().await;
        info!("Location ready: {}", state.status());
    });

    let engine = FilterEngine::new(settings.risk.classifier());
    let filters = Arc::new(FilterCache::new(engine, settings.cache.filter_cache_size));

    info!(
        "Filter engine initialized ({} high-risk codes, cache {} entries)",
        settings.risk.category_codes.len(),
        settings.cache.filter_cache_size
    );

    let app_state = AppState {
        dataset: Arc::new(dataset),
        session,
        resolver,
        filters,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(1);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
