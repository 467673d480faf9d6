use axum::{
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::observability::encode_metrics;
use crate::openapi::ApiDoc;

pub mod auth;
pub mod experiences;
pub mod files;
pub mod posts;
pub mod tags;

use auth::ServerState;

/// Room for the JSON part and multipart framing on top of the file bytes.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;
/// Files accepted in one create request at the per-file maximum.
const MAX_FILES_PER_POST: usize = 10;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

/// Largest request body the create endpoint accepts.
pub fn create_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes
        .saturating_mul(MAX_FILES_PER_POST)
        .saturating_add(FORM_OVERHEAD_BYTES)
}

/// Build the full application router: public, auth and member-scoped API routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let body_limit = create_body_limit(state.files().max_upload_bytes());

    // Public routes (health + metrics)
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    // Member-scoped API; every handler takes `CurrentMember`
    let api = Router::new()
        .route(
            "/api/posts",
            get(posts::list).post(posts::create).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/posts/removed", get(posts::list_removed))
        .route("/api/posts/search", get(posts::search))
        .route("/api/posts/:id", get(posts::get).patch(posts::update).delete(posts::delete))
        .route("/api/posts/:id/restore", patch(posts::restore))
        .route("/api/posts/:id/hard", delete(posts::hard_delete))
        .route("/api/tags", get(tags::list))
        .route("/api/experiences/:id", patch(experiences::update))
        .route("/api/files/:id", get(files::download));

    // Compose
    public
        .merge(auth_routes)
        .merge(api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and the like are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_covers_files_and_form() {
        assert_eq!(create_body_limit(10), 10 * MAX_FILES_PER_POST + FORM_OVERHEAD_BYTES);
        assert_eq!(create_body_limit(usize::MAX), usize::MAX);
    }
}
