//! HTTP handlers and route configuration.

mod health;
mod posts;
mod ratings;


use actix_web::web;

use crate::middleware::error::{json_error_handler, query_error_handler};

/// Configure all application routes and extractor settings.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/posts")
            .route("", web::post().to(posts::create))
            .route("/top", web::get().to(posts::top))
            .route("/shared_ips", web::get().to(posts::shared_ips))
            .route("/{post_id}/ratings", web::post().to(ratings::create)),
    );
}
