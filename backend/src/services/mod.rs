//! HTTP endpoints, grouped by area. Each area exposes a `configure_routes`
//! scope that `main.rs` mounts.

pub mod health;
pub mod returns;

use actix_web::web;

/// Largest accepted JSON submission body.
const JSON_LIMIT: usize = 1024 * 1024;

/// Registers every API route. The embedded frontend is mounted separately
/// as the default service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT))
        .service(returns::configure_routes())
        .route("/health", web::get().to(health::process));
}
