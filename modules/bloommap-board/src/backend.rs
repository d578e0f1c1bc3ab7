//! The seam between the board and the hosted data service.

use anyhow::Result;
use async_trait::async_trait;
use bloommap_common::{GrowthStage, Profile, Role, SightingRecord, Species};
use chrono::NaiveDate;
use serde::Serialize;

/// Insert payload for a sighting. The author id comes from the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSighting {
    pub user_id: String,
    pub region_name: String,
    pub lat: f64,
    pub lon: f64,
    pub species: Species,
    pub stage: GrowthStage,
    pub date: NaiveDate,
    pub photo_url: Option<String>,
    pub note: Option<String>,
}

/// Remote storage for sightings and profiles.
///
/// Write methods take the caller's access token so the service can
/// enforce ownership itself. Methods that target one row return `None`
/// (or `false`) when no row was affected.
#[async_trait]
pub trait SightingBackend: Send + Sync {
    /// All sightings, newest first, with author nickname and role joined in.
    async fn list_sightings(&self) -> Result<Vec<SightingRecord>>;

    async fn get_sighting(&self, id: &str) -> Result<Option<SightingRecord>>;

    async fn insert_sighting(&self, token: &str, new: &NewSighting) -> Result<SightingRecord>;

    async fn update_note(
        &self,
        token: &str,
        id: &str,
        note: Option<&str>,
    ) -> Result<Option<SightingRecord>>;

    async fn delete_sighting(&self, token: &str, id: &str) -> Result<bool>;

    /// Store a photo and return its public URL.
    async fn upload_photo(
        &self,
        token: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>>;

    async fn update_nickname(
        &self,
        token: &str,
        user_id: &str,
        nickname: &str,
    ) -> Result<Option<Profile>>;

    async fn set_role(&self, token: &str, user_id: &str, role: Role) -> Result<Option<Profile>>;
}
