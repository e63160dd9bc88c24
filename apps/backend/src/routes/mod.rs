use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Configure application routes.
///
/// `main.rs` adds the middleware stack around these; tests register the
/// same paths bare so endpoint behavior can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Public room listing: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // Realtime: /ws
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));
}
