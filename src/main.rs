use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use local_jobs::config::{DatabaseBackend, Settings};
use local_jobs::routes::{self, AppState, TokenVerifier};
use local_jobs::services::{JobBoard, JobStore, MapboxGeocoder, MemoryStore, PostgresStore};

fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    init_logging();

    info!("Starting local jobs service...");

    let settings = Settings::load().map_err(|e| startup_error("Configuration error", e))?;
    let matcher = settings
        .job_matcher()
        .map_err(|e| startup_error("Configuration error", e))?;

    let area = matcher.engine().service_area();
    info!(
        "Service area: {} km around ({}, {}), default search radius {} km",
        area.radius_km(),
        area.center().latitude,
        area.center().longitude,
        matcher.default_radius_km()
    );

    let store: Arc<dyn JobStore> = match settings.database.backend {
        DatabaseBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        DatabaseBackend::Postgres => {
            let db = &settings.database;
            let store = PostgresStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!("PostgreSQL store initialized");
            Arc::new(store)
        }
    };

    let geocoding = &settings.geocoding;
    if geocoding.access_token.is_empty() {
        warn!("MAPBOX_ACCESS_TOKEN is not set; every address will be unresolved");
    }
    let geocoder = MapboxGeocoder::new(
        geocoding.endpoint.clone(),
        geocoding.access_token.clone(),
        geocoding.country.clone(),
        geocoding.timeout(),
    )
    .map_err(|e| startup_error("Failed to build geocoding client", e))?;

    info!("Geocoder initialized (country: {})", geocoding.country);

    if settings.auth.jwt_secret.is_empty() {
        return Err(startup_error("Configuration error", "JWT_SECRET must be set"));
    }
    let verifier = web::Data::new(TokenVerifier::new(settings.auth.jwt_secret.as_bytes()));

    let app_state = AppState {
        board: Arc::new(JobBoard::new(store, Arc::new(geocoder), matcher)),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(verifier.clone())
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
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
