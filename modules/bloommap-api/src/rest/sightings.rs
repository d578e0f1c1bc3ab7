use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use bloommap_board::{PhotoUpload, SightingDraft, SightingFilter};
use bloommap_common::{GrowthStage, Species};

use crate::auth::RequireUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize, Default)]
pub struct SightingsQuery {
    pub q: Option<String>,
    pub species: Option<String>,
    pub stage: Option<String>,
    /// Author user id.
    pub author: Option<String>,
}

impl SightingsQuery {
    /// Build a board filter. Blank values and `all` mean no constraint.
    pub fn to_filter(&self) -> Result<SightingFilter, ApiError> {
        fn choice(raw: &Option<String>) -> Option<&str> {
            raw.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        }

        let species = choice(&self.species)
            .map(|s| s.parse::<Species>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let stage = choice(&self.stage)
            .map(|s| s.parse::<GrowthStage>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let query = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        let author = choice(&self.author).map(str::to_string);

        Ok(SightingFilter {
            query,
            species,
            stage,
            author,
        })
    }
}

#[derive(Deserialize)]
pub struct UpdateSightingRequest {
    note: Option<String>,
}

fn bad_field(name: &str, value: &str) -> ApiError {
    ApiError::BadRequest(format!("Invalid {name}: {value}"))
}

/// Read the report form. Unknown fields are ignored.
async fn read_draft(mut multipart: Multipart) -> Result<SightingDraft, ApiError> {
    let mut draft = SightingDraft::default();
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            // Browsers send an unnamed empty part when no file is chosen.
            if !(bytes.is_empty() && file_name.is_empty()) {
                draft.photo = Some(PhotoUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let value = value.trim();
        match name.as_str() {
            "region_name" => draft.region_name = value.to_string(),
            "species" if !value.is_empty() => {
                draft.species = value.parse().map_err(|_| bad_field("species", value))?
            }
            "stage" if !value.is_empty() => {
                draft.stage = Some(value.parse().map_err(|_| bad_field("stage", value))?)
            }
            "date" if !value.is_empty() => {
                draft.date = Some(
                    NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .map_err(|_| bad_field("date", value))?,
                )
            }
            "lat" if !value.is_empty() => {
                lat = Some(value.parse().map_err(|_| bad_field("lat", value))?)
            }
            "lon" if !value.is_empty() => {
                lon = Some(value.parse().map_err(|_| bad_field("lon", value))?)
            }
            "note" => draft.note = Some(value.to_string()),
            _ => {}
        }
    }

    draft.coordinates = lat.zip(lon);
    Ok(draft)
}

pub async fn api_sightings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SightingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.to_filter()?;
    let sightings = state.board.list(&filter).await?;
    Ok(Json(serde_json::json!({
        "count": sightings.len(),
        "sightings": sightings,
    })))
}

pub async fn api_sighting_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.board.lookup(&id).await? {
        Some(sighting) => Ok(Json(sighting)),
        None => Err(ApiError::NotFound(format!("sighting {id}"))),
    }
}

pub async fn api_create_sighting(
    State(state): State<Arc<AppState>>,
    RequireUser(ctx): RequireUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let draft = read_draft(multipart).await?;
    let today = Utc::now().date_naive();
    let record = state.board.submit(&ctx, draft, today).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn api_update_sighting(
    State(state): State<Arc<AppState>>,
    RequireUser(ctx): RequireUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateSightingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.board.edit_note(&ctx, &id, body.note).await?;
    Ok(Json(record))
}

pub async fn api_delete_sighting(
    State(state): State<Arc<AppState>>,
    RequireUser(ctx): RequireUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.board.delete(&ctx, &id).await?;
    info!(sighting_id = %id, "Sighting removed via API");
    Ok(StatusCode::NO_CONTENT)
}
