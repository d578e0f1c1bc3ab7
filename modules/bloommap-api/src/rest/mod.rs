pub mod profile;
pub mod sightings;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Deserialize;

use bloommap_common::{PredictionKey, Species};
use bloommap_forecast::{
    classify, format, project_predictions, species_stats, viewing_window, Descriptor,
    GridProjector, MapProjector, Position, Projection, Projector, ViewKind,
};

use crate::error::ApiError;
use crate::AppState;

// --- Query structs ---

#[derive(Deserialize)]
pub struct PredictionsQuery {
    species: Option<String>,
    view: Option<String>,
}

// --- Helpers ---

/// Parse an optional species parameter. Absent means the default species.
pub fn parse_species(raw: Option<&str>) -> Result<Species, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Species::default()),
        Some(s) => s.parse().map_err(|_| ApiError::BadRequest(format!("Unknown species: {s}"))),
    }
}

pub fn parse_view(raw: Option<&str>) -> Result<ViewKind, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(ViewKind::default()),
        Some(s) => s.parse().map_err(ApiError::BadRequest),
    }
}

pub fn projector_for(view: ViewKind) -> Box<dyn Projector + Send + Sync> {
    match view {
        ViewKind::Map => Box::new(MapProjector),
        ViewKind::Grid => Box::new(GridProjector::default()),
    }
}

fn descriptor_properties(d: &Descriptor) -> serde_json::Value {
    serde_json::json!({
        "region_code": d.key.region_code,
        "species": d.key.species,
        "icon": d.icon,
        "fill_color": d.fill_color,
        "tier": d.tier,
        "region_name": d.summary.region_name,
        "predicted_date": d.summary.predicted_date,
        "confidence_window": d.summary.confidence_window,
        "days_until_bloom": d.summary.days_until_bloom,
        "countdown": d.summary.countdown,
        "status": d.summary.status_label,
    })
}

/// Map markers as a GeoJSON feature collection.
pub fn projection_to_geojson(projection: &Projection) -> serde_json::Value {
    let features: Vec<serde_json::Value> = projection
        .descriptors
        .iter()
        .filter_map(|d| match d.position {
            Position::Geo { lat, lon } => Some(serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [lon, lat]
                },
                "properties": descriptor_properties(d),
            })),
            Position::Cell { .. } => None,
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

// --- Handlers ---

pub async fn api_predictions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let species = parse_species(params.species.as_deref())?;
    let view = parse_view(params.view.as_deref())?;
    let projection = project_predictions(&state.store, species, Utc::now(), &*projector_for(view));

    let body = match view {
        ViewKind::Map => projection_to_geojson(&projection),
        ViewKind::Grid => serde_json::json!({
            "view": projection.view,
            "cards": projection
                .descriptors
                .iter()
                .map(|d| {
                    let mut props = descriptor_properties(d);
                    props["position"] = serde_json::json!(d.position);
                    props
                })
                .collect::<Vec<_>>(),
            "hidden": projection.hidden,
        }),
    };
    Ok(Json(body))
}

pub async fn api_prediction_detail(
    State(state): State<Arc<AppState>>,
    Path((region_code, species)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let species = parse_species(Some(&species))?;
    let key = PredictionKey::new(region_code, species);
    let record = state
        .store
        .get(&key)
        .ok_or_else(|| ApiError::NotFound(format!("prediction {key}")))?;

    let status = classify(record, Utc::now());
    let window = viewing_window(record.predicted_date);
    let info = species.info();

    Ok(Json(serde_json::json!({
        "key": key,
        "record": record,
        "species": {
            "name": info.name,
            "local_name": info.local_name,
            "icon": info.icon,
            "season": info.season,
            "duration": info.duration,
            "feature": info.feature,
        },
        "status": {
            "tier": status.tier,
            "label": status.label(),
            "color": status.color(),
            "days_until_bloom": status.days,
            "countdown": status.countdown(),
        },
        "predicted_date_label": format::long_date(record.predicted_date),
        "confidence_window_label": format::date_range(record.confidence_low, record.confidence_high),
        "best_viewing": {
            "earliest": window.earliest,
            "latest": window.latest,
            "label": format::date_range(window.earliest, window.latest),
        },
    })))
}

pub async fn api_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = Utc::now();
    let stats: Vec<serde_json::Value> = Species::ALL
        .iter()
        .map(|&species| {
            let records = bloommap_forecast::filter_species(state.store.records(), species);
            let s = species_stats(records, now);
            serde_json::json!({
                "species": species,
                "icon": species.info().icon,
                "total": s.total,
                "blooming": s.blooming,
            })
        })
        .collect();
    Json(serde_json::json!({ "species": stats }))
}

pub async fn api_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let contributors = state.board.leaderboard().await?;
    Ok(Json(serde_json::json!({ "contributors": contributors })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_defaults_to_cherry() {
        assert_eq!(parse_species(None).unwrap(), Species::Cherry);
        assert_eq!(parse_species(Some("  ")).unwrap(), Species::Cherry);
        assert_eq!(parse_species(Some("Azalea")).unwrap(), Species::Azalea);
        assert!(parse_species(Some("tulip")).is_err());
    }

    #[test]
    fn view_parses_known_kinds() {
        assert_eq!(parse_view(None).unwrap(), ViewKind::Map);
        assert_eq!(parse_view(Some("grid")).unwrap(), ViewKind::Grid);
        assert!(parse_view(Some("globe")).is_err());
    }
}
