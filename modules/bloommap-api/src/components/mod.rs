use chrono::{DateTime, Utc};

use bloommap_common::{AuthSession, PredictionRecord, SightingRecord, Species};
use bloommap_forecast::{classify, format, species_stats, viewing_window, PredictionStore};

pub mod admin;
pub mod board;
pub mod hall_of_fame;
pub mod layout;
pub mod map;
pub mod message;
pub mod profile;
pub mod sighting_detail;

pub use admin::{render_admin, AdminFilterView, AdminView, AuthorOption};
pub use board::{render_board, BoardFilterView};
pub use hall_of_fame::render_hall_of_fame;
pub use map::{render_map, MapView};
pub use message::render_message;
pub use profile::render_profile;
pub use sighting_detail::render_sighting_detail;

// --- View Models ---

#[derive(Clone, PartialEq)]
pub struct UserView {
    pub display_name: String,
    pub is_privileged: bool,
}

impl From<&AuthSession> for UserView {
    fn from(session: &AuthSession) -> Self {
        Self {
            display_name: session.display_name.clone(),
            is_privileged: session.is_privileged,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct SpeciesTab {
    pub slug: &'static str,
    pub icon: &'static str,
    pub name: &'static str,
    pub total: usize,
    pub blooming: usize,
    pub active: bool,
}

pub fn species_tabs(store: &PredictionStore, active: Species, now: DateTime<Utc>) -> Vec<SpeciesTab> {
    Species::ALL
        .iter()
        .map(|&species| {
            let stats = species_stats(
                bloommap_forecast::filter_species(store.records(), species),
                now,
            );
            let info = species.info();
            SpeciesTab {
                slug: species.as_str(),
                icon: info.icon,
                name: info.name,
                total: stats.total,
                blooming: stats.blooming,
                active: species == active,
            }
        })
        .collect()
}

/// Side panel content for the selected prediction.
#[derive(Clone, PartialEq)]
pub struct PredictionDetailView {
    pub region_name: String,
    pub species_icon: &'static str,
    pub species_name: &'static str,
    pub local_name: &'static str,
    pub predicted: String,
    pub confidence_window: String,
    pub best_viewing: String,
    pub countdown: Option<String>,
    pub status_label: &'static str,
    pub color: &'static str,
    pub season: &'static str,
    pub duration: &'static str,
    pub feature: &'static str,
    pub model_version: String,
    pub updated: String,
}

pub fn prediction_detail(record: &PredictionRecord, now: DateTime<Utc>) -> PredictionDetailView {
    let status = classify(record, now);
    let window = viewing_window(record.predicted_date);
    let info = record.species.info();
    PredictionDetailView {
        region_name: record.region_name.clone(),
        species_icon: info.icon,
        species_name: info.name,
        local_name: info.local_name,
        predicted: format::long_date(record.predicted_date),
        confidence_window: format::date_range(record.confidence_low, record.confidence_high),
        best_viewing: format::date_range(window.earliest, window.latest),
        countdown: status.countdown(),
        status_label: status.label(),
        color: status.color(),
        season: info.season,
        duration: info.duration,
        feature: info.feature,
        model_version: record.model_version.clone(),
        updated: format::date_time(record.updated_at),
    }
}

#[derive(Clone, PartialEq)]
pub struct SightingView {
    pub id: String,
    pub nickname: String,
    pub author_privileged: bool,
    pub region_name: String,
    pub species_icon: &'static str,
    pub species_name: &'static str,
    pub stage_label: &'static str,
    pub date: String,
    pub photo_url: Option<String>,
    pub note: Option<String>,
    pub created: String,
    pub lat: f64,
    pub lon: f64,
    pub can_edit: bool,
    pub can_delete: bool,
}

pub fn sighting_to_view(s: &SightingRecord, session: Option<&AuthSession>) -> SightingView {
    let info = s.species.info();
    SightingView {
        id: s.id.clone(),
        nickname: s.nickname.clone(),
        author_privileged: s.author_privileged,
        region_name: s.region_name.clone(),
        species_icon: info.icon,
        species_name: info.name,
        stage_label: s.stage.label(),
        date: format::medium_date(s.date),
        photo_url: s.photo_url.clone(),
        note: s.note.clone(),
        created: format::date_time(s.created_at),
        lat: s.lat,
        lon: s.lon,
        can_edit: session.is_some_and(|u| bloommap_board::permissions::can_edit(u, s)),
        can_delete: session.is_some_and(|u| bloommap_board::permissions::can_delete(u, s)),
    }
}
