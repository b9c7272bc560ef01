//! Leaderboard HTTP service: an append-only SQLite score table behind a
//! small JSON API.

pub mod config;
mod handlers;
pub mod response;
pub mod store;
pub mod types;

use actix_web::web;

/// Registers `/api/health`, `/api/scores`, the JSON 404 fallback and a JSON
/// error for unreadable query strings.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(handlers::query_error))
        .route("/api/health", web::get().to(handlers::health))
        .route("/api/scores", web::get().to(handlers::list_scores))
        .route("/api/scores", web::post().to(handlers::submit_score))
        .default_service(web::to(handlers::not_found));
}
