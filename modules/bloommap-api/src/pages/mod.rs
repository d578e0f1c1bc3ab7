use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use bloommap_board::{BoardError, BoardState, ProfileSummary};
use bloommap_common::{AuthContext, PredictionKey, Role};
use bloommap_forecast::{project_predictions, SelectionController};

use crate::auth::{CurrentUser, RequireUser};
use crate::components::{
    prediction_detail, render_admin, render_board, render_hall_of_fame, render_map,
    render_message, render_profile, render_sighting_detail, sighting_to_view, species_tabs,
    AdminFilterView, AdminView, AuthorOption, BoardFilterView, MapView, UserView,
};
use crate::error::{board_status, ApiError};
use crate::rest::sightings::SightingsQuery;
use crate::rest::{parse_species, parse_view, projector_for};
use crate::AppState;

/// Sightings listed on the admin page at most.
const ADMIN_SIGHTING_LIMIT: usize = 50;

#[derive(Deserialize)]
pub struct MapQuery {
    species: Option<String>,
    view: Option<String>,
    selected: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct AdminQuery {
    q: Option<String>,
    role: Option<String>,
    author: Option<String>,
}

fn user_view(user: &Option<AuthContext>) -> Option<UserView> {
    user.as_ref().map(|ctx| UserView::from(&ctx.session))
}

fn message_page(
    status: StatusCode,
    user: Option<UserView>,
    title: &str,
    message: &str,
    back_href: &str,
    back_label: &str,
) -> Response {
    (
        status,
        Html(render_message(user, title, message, back_href, back_label)),
    )
        .into_response()
}

fn error_page(user: Option<UserView>, err: BoardError) -> Response {
    let status = board_status(&err);
    match err {
        BoardError::Backend(e) => {
            warn!(error = %e, "Data service request failed");
            message_page(
                status,
                user,
                "Something went wrong",
                "The data service is unavailable right now. Please try again shortly.",
                "/map",
                "Back to the map",
            )
        }
        BoardError::Unauthenticated => message_page(
            status,
            user,
            "Sign-in required",
            "Please sign in to continue.",
            "/map",
            "Back to the map",
        ),
        other => message_page(status, user, "Not available", &other.to_string(), "/board", "Back to sightings"),
    }
}

// --- Map ---

pub async fn map_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<MapQuery>,
) -> Response {
    let user = user_view(&user);
    let (species, view) = match (
        parse_species(params.species.as_deref()),
        parse_view(params.view.as_deref()),
    ) {
        (Ok(species), Ok(view)) => (species, view),
        (Err(e), _) | (_, Err(e)) => {
            return message_page(
                StatusCode::BAD_REQUEST,
                user,
                "Unknown selection",
                &e.to_string(),
                "/map",
                "Back to the map",
            );
        }
    };

    let now = Utc::now();

    let mut selection = SelectionController::new();
    if let Some(code) = params.selected.as_deref().filter(|c| !c.is_empty()) {
        selection.select(PredictionKey::new(code, species));
    }
    // A key that no longer resolves falls back to no selection.
    let selected_record = selection.resolve(&state.store);
    let detail = selected_record.map(|r| prediction_detail(r, now));
    let selected = selected_record.map(|r| r.region_code.clone());

    let projection = project_predictions(&state.store, species, now, &*projector_for(view));

    let map = MapView {
        species,
        view,
        tabs: species_tabs(&state.store, species, now),
        projection,
        selected,
        detail,
    };
    Html(render_map(user, map)).into_response()
}

// --- Board ---

pub async fn board_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<SightingsQuery>,
) -> Response {
    let session = user.as_ref().map(|ctx| &ctx.session);
    let view_user = user_view(&user);

    let filter = match params.to_filter() {
        Ok(filter) => filter,
        Err(e) => {
            return message_page(
                StatusCode::BAD_REQUEST,
                view_user,
                "Unknown filter",
                &e.to_string(),
                "/board",
                "Back to sightings",
            );
        }
    };

    let board = match BoardState::load(&state.board).await {
        Ok(board) => board,
        Err(e) => return error_page(view_user, e),
    };
    let sightings = board
        .visible(&filter)
        .into_iter()
        .map(|s| sighting_to_view(s, session))
        .collect();

    let filter_view = BoardFilterView {
        q: params.q.clone().unwrap_or_default(),
        species: params.species.clone().unwrap_or_default(),
        stage: params.stage.clone().unwrap_or_default(),
    };
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    Html(render_board(view_user, sightings, filter_view, today)).into_response()
}

pub async fn sighting_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    let view_user = user_view(&user);
    match state.board.lookup(&id).await {
        Ok(Some(sighting)) => {
            let view = sighting_to_view(&sighting, user.as_ref().map(|ctx| &ctx.session));
            Html(render_sighting_detail(view_user, view)).into_response()
        }
        Ok(None) => message_page(
            StatusCode::NOT_FOUND,
            view_user,
            "Sighting not found",
            "This sighting may have been removed by its author or a moderator.",
            "/board",
            "Back to sightings",
        ),
        Err(e) => error_page(view_user, e),
    }
}

// --- Leaderboard ---

pub async fn hall_of_fame_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let view_user = user_view(&user);
    match state.board.leaderboard().await {
        Ok(contributors) => Html(render_hall_of_fame(view_user, contributors)).into_response(),
        Err(e) => error_page(view_user, e),
    }
}

// --- Profile ---

/// Unwrap a required sign-in for an HTML page, rendering failures as pages.
fn page_user(user: Result<RequireUser, ApiError>) -> Result<AuthContext, Response> {
    match user {
        Ok(RequireUser(ctx)) => Ok(ctx),
        Err(ApiError::Board(e)) => Err(error_page(None, e)),
        Err(other) => Err(other.into_response()),
    }
}

pub async fn profile_page(
    State(state): State<Arc<AppState>>,
    user: Result<RequireUser, ApiError>,
) -> Response {
    let ctx = match page_user(user) {
        Ok(ctx) => ctx,
        Err(page) => return page,
    };
    let view_user = Some(UserView::from(&ctx.session));
    match state.board.own_profile(&ctx).await {
        Ok(summary) => Html(render_profile(view_user, summary)).into_response(),
        Err(e) => error_page(view_user, e),
    }
}

// --- Admin ---

fn parse_role_filter(raw: Option<&str>) -> Result<Option<Role>, String> {
    match raw.map(str::trim).unwrap_or("") {
        "" | "all" => Ok(None),
        "admin" => Ok(Some(Role::Admin)),
        "user" => Ok(Some(Role::User)),
        other => Err(format!("Unknown role: {other}")),
    }
}

fn member_matches(p: &ProfileSummary, needle: &str, role: Option<Role>) -> bool {
    role.map_or(true, |r| p.profile.role == r)
        && (needle.is_empty() || p.profile.nickname.to_lowercase().contains(needle))
}

pub async fn admin_page(
    State(state): State<Arc<AppState>>,
    user: Result<RequireUser, ApiError>,
    Query(params): Query<AdminQuery>,
) -> Response {
    let ctx = match page_user(user) {
        Ok(ctx) => ctx,
        Err(page) => return page,
    };
    let view_user = Some(UserView::from(&ctx.session));

    let role = match parse_role_filter(params.role.as_deref()) {
        Ok(role) => role,
        Err(message) => {
            return message_page(
                StatusCode::BAD_REQUEST,
                view_user,
                "Unknown filter",
                &message,
                "/admin",
                "Back to admin",
            );
        }
    };
    let sighting_query = SightingsQuery {
        q: params.q.clone(),
        author: params.author.clone(),
        ..Default::default()
    };
    let filter = match sighting_query.to_filter() {
        Ok(filter) => filter,
        Err(e) => {
            return message_page(
                StatusCode::BAD_REQUEST,
                view_user,
                "Unknown filter",
                &e.to_string(),
                "/admin",
                "Back to admin",
            );
        }
    };

    // The privilege check lives in `profiles`; a non-admin never sees the list.
    let profiles = match state.board.profiles(&ctx).await {
        Ok(profiles) => profiles,
        Err(e) => return error_page(view_user, e),
    };
    let sightings = match state.board.list(&filter).await {
        Ok(sightings) => sightings,
        Err(e) => return error_page(view_user, e),
    };

    let needle = params.q.as_deref().unwrap_or("").trim().to_lowercase();
    let admin = AdminView {
        member_total: profiles.len(),
        admin_total: profiles
            .iter()
            .filter(|p| p.profile.role.is_privileged())
            .count(),
        authors: profiles
            .iter()
            .map(|p| AuthorOption {
                user_id: p.profile.user_id.clone(),
                nickname: p.profile.nickname.clone(),
            })
            .collect(),
        members: profiles
            .iter()
            .filter(|p| member_matches(p, &needle, role))
            .cloned()
            .collect(),
        sighting_total: sightings.len(),
        sightings: sightings
            .iter()
            .take(ADMIN_SIGHTING_LIMIT)
            .map(|s| sighting_to_view(s, Some(&ctx.session)))
            .collect(),
        filter: AdminFilterView {
            q: params.q.clone().unwrap_or_default(),
            role: params.role.clone().unwrap_or_default(),
            author: params.author.clone().unwrap_or_default(),
        },
    };
    Html(render_admin(view_user, admin)).into_response()
}

pub async fn not_found_page(CurrentUser(user): CurrentUser) -> Response {
    message_page(
        StatusCode::NOT_FOUND,
        user_view(&user),
        "Page not found",
        "There is nothing at this address.",
        "/map",
        "Back to the map",
    )
}
