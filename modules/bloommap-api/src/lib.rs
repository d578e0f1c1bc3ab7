//! HTTP surface for BloomMap: server-rendered pages and a JSON API over the
//! forecast pipeline and the community board.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, patch, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use bloommap_board::Board;
use bloommap_forecast::PredictionStore;

pub mod auth;
pub mod components;
pub mod error;
pub mod jwt;
pub mod pages;
pub mod rest;
pub mod templates;

use jwt::JwtService;

/// Multipart overhead allowed on top of the photo cap, so oversized photos
/// reach validation instead of failing on the body limit.
const UPLOAD_SLACK_BYTES: usize = 1024 * 1024;

pub struct AppState {
    pub store: Arc<PredictionStore>,
    pub board: Board,
    pub jwt: JwtService,
    pub photo_max_bytes: usize,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.photo_max_bytes + UPLOAD_SLACK_BYTES;

    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Pages (Dioxus SSR)
        .route("/map", get(pages::map_page))
        .route("/board", get(pages::board_page))
        .route("/board/{id}", get(pages::sighting_page))
        .route("/hall-of-fame", get(pages::hall_of_fame_page))
        .route("/profile", get(pages::profile_page))
        .route("/admin", get(pages::admin_page))
        // REST API
        .route("/api/predictions", get(rest::api_predictions))
        .route(
            "/api/predictions/{region_code}/{species}",
            get(rest::api_prediction_detail),
        )
        .route("/api/stats", get(rest::api_stats))
        .route(
            "/api/sightings",
            get(rest::sightings::api_sightings)
                .post(rest::sightings::api_create_sighting)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/sightings/{id}",
            get(rest::sightings::api_sighting_detail)
                .patch(rest::sightings::api_update_sighting)
                .delete(rest::sightings::api_delete_sighting),
        )
        .route("/api/leaderboard", get(rest::api_leaderboard))
        .route("/api/profile", patch(rest::profile::api_update_profile))
        .route("/api/admin/profiles", get(rest::profile::api_admin_profiles))
        .route(
            "/api/admin/profiles/{user_id}/role",
            post(rest::profile::api_toggle_role),
        )
        .fallback(pages::not_found_page)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only (no query params, no tokens)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
