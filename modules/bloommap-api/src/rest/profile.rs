use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::auth::RequireUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    nickname: String,
}

pub async fn api_update_profile(
    State(state): State<Arc<AppState>>,
    RequireUser(ctx): RequireUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.board.update_nickname(&ctx, &body.nickname).await?;
    Ok(Json(profile))
}

pub async fn api_admin_profiles(
    State(state): State<Arc<AppState>>,
    RequireUser(ctx): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let profiles = state.board.profiles(&ctx).await?;
    Ok(Json(serde_json::json!({ "profiles": profiles })))
}

pub async fn api_toggle_role(
    State(state): State<Arc<AppState>>,
    RequireUser(ctx): RequireUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.board.toggle_role(&ctx, &user_id).await?;
    Ok(Json(profile))
}
