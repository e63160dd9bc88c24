use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use truco_backend::middleware::cors::cors_middleware;
use truco_backend::middleware::structured_logger::StructuredLogger;
use truco_backend::routes;
use truco_backend::{AppState, ServerConfig};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or sourced manually for local dev).
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        next_hand_delay_ms = config.next_hand_delay.as_millis() as u64,
        admin_enabled = config.admin_token.is_some(),
        favored_player = config.favored_player.is_some(),
        "Starting Truco backend"
    );

    let bind = (config.host.clone(), config.port);
    let data = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
