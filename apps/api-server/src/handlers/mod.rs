//! HTTP handlers and route configuration.

mod health;

use actix_web::{HttpResponse, web};

use postboard_shared::ErrorResponse;

use crate::graphql;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .service(
            web::resource("/graphql")
                .route(web::post().to(graphql::graphql_handler))
                .route(web::get().to(graphql::graphiql)),
        );
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found("Route not found"))
}
