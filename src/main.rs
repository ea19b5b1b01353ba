use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;

use timeclock::config::Config;
use timeclock::docs::ApiDoc;
use timeclock::routes;
use timeclock::state::{AppState, TimeClock};
use timeclock::store::JsonFileStore;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Time clock is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "timeclock.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Time clock starting...");

    let store = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("cannot open store at {}", config.store_path))?;
    info!(path = %store.path().display(), "Using store");
    let clock = TimeClock::load(Box::new(store)).context("cannot load time clock state")?;

    let geofence = config.geofence();
    match &geofence {
        Some(fence) => info!(
            latitude = fence.reference.latitude,
            longitude = fence.reference.longitude,
            radius_meters = fence.radius_meters,
            "Geofence enabled"
        ),
        None => warn!("Geofence disabled, punches are accepted from anywhere"),
    }

    let state = Data::new(AppState::new(clock, geofence));
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("cannot bind {}", server_addr))?
    .run()
    .await
    .context("server stopped with an error")
}
