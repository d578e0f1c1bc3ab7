use anyhow::{Context, Result};
use async_trait::async_trait;
use bloommap_common::{GrowthStage, Profile, Role, SightingRecord, Species};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use supabase_client::{Query, SupabaseClient};

use crate::backend::{NewSighting, SightingBackend};

const SIGHTINGS: &str = "sightings";
const PROFILES: &str = "profiles";
const SIGHTING_COLUMNS: &str = "*,profiles(nickname,role)";
const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Deserialize)]
struct AuthorRow {
    nickname: String,
    #[serde(default)]
    role: Role,
}

#[derive(Debug, Deserialize)]
struct SightingRow {
    id: String,
    user_id: String,
    region_name: String,
    lat: f64,
    lon: f64,
    species: Species,
    stage: GrowthStage,
    date: NaiveDate,
    photo_url: Option<String>,
    memo: Option<String>,
    created_at: DateTime<Utc>,
    profiles: Option<AuthorRow>,
}

impl From<SightingRow> for SightingRecord {
    fn from(row: SightingRow) -> Self {
        let (nickname, author_privileged) = match row.profiles {
            Some(author) => (author.nickname, author.role.is_privileged()),
            None => (ANONYMOUS.to_string(), false),
        };
        SightingRecord {
            id: row.id,
            user_id: row.user_id,
            nickname,
            author_privileged,
            region_name: row.region_name,
            lat: row.lat,
            lon: row.lon,
            species: row.species,
            stage: row.stage,
            date: row.date,
            photo_url: row.photo_url,
            note: row.memo,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct SightingInsert<'a> {
    user_id: &'a str,
    region_name: &'a str,
    lat: f64,
    lon: f64,
    species: Species,
    stage: GrowthStage,
    date: NaiveDate,
    photo_url: Option<&'a str>,
    memo: Option<&'a str>,
}

impl<'a> From<&'a NewSighting> for SightingInsert<'a> {
    fn from(new: &'a NewSighting) -> Self {
        Self {
            user_id: &new.user_id,
            region_name: &new.region_name,
            lat: new.lat,
            lon: new.lon,
            species: new.species,
            stage: new.stage,
            date: new.date,
            photo_url: new.photo_url.as_deref(),
            memo: new.note.as_deref(),
        }
    }
}

/// [`SightingBackend`] over Supabase tables `sightings` and `profiles` and
/// one storage bucket.
pub struct SupabaseBackend {
    client: SupabaseClient,
    /// Service-role client for privilege lookups that must bypass row-level security.
    service: Option<SupabaseClient>,
    bucket: String,
}

impl SupabaseBackend {
    pub fn new(client: SupabaseClient, service: Option<SupabaseClient>, bucket: String) -> Self {
        Self {
            client,
            service,
            bucket,
        }
    }

    fn reader(&self) -> &SupabaseClient {
        self.service.as_ref().unwrap_or(&self.client)
    }
}

#[async_trait]
impl SightingBackend for SupabaseBackend {
    async fn list_sightings(&self) -> Result<Vec<SightingRecord>> {
        let query = Query::new().select(SIGHTING_COLUMNS).order_desc("created_at");
        let rows: Vec<SightingRow> = self
            .client
            .select(SIGHTINGS, &query, None)
            .await
            .context("listing sightings")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_sighting(&self, id: &str) -> Result<Option<SightingRecord>> {
        let query = Query::new().select(SIGHTING_COLUMNS).eq("id", id).limit(1);
        let rows: Vec<SightingRow> = self
            .client
            .select(SIGHTINGS, &query, None)
            .await
            .context("fetching sighting")?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn insert_sighting(&self, token: &str, new: &NewSighting) -> Result<SightingRecord> {
        let body = SightingInsert::from(new);
        let query = Query::new().select(SIGHTING_COLUMNS);
        let rows: Vec<SightingRow> = self
            .client
            .insert(SIGHTINGS, &body, &query, Some(token))
            .await
            .context("inserting sighting")?;
        rows.into_iter()
            .next()
            .map(Into::into)
            .context("insert returned no row")
    }

    async fn update_note(
        &self,
        token: &str,
        id: &str,
        note: Option<&str>,
    ) -> Result<Option<SightingRecord>> {
        let filters = Query::new().eq("id", id).select(SIGHTING_COLUMNS);
        let body = serde_json::json!({ "memo": note });
        let rows: Vec<SightingRow> = self
            .client
            .update(SIGHTINGS, &filters, &body, Some(token))
            .await
            .context("updating sighting note")?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn delete_sighting(&self, token: &str, id: &str) -> Result<bool> {
        let filters = Query::new().eq("id", id);
        let removed = self
            .client
            .delete(SIGHTINGS, &filters, Some(token))
            .await
            .context("deleting sighting")?;
        Ok(removed > 0)
    }

    async fn upload_photo(
        &self,
        token: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        self.client
            .upload_object(&self.bucket, path, bytes, content_type, Some(token))
            .await
            .context("uploading photo")
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let query = Query::new().select("*").eq("user_id", user_id).limit(1);
        let rows: Vec<Profile> = self
            .reader()
            .select(PROFILES, &query, None)
            .await
            .context("fetching profile")?;
        Ok(rows.into_iter().next())
    }

    async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>> {
        let query = Query::new().select("*").order_desc("created_at");
        self.client
            .select(PROFILES, &query, Some(token))
            .await
            .context("listing profiles")
    }

    async fn update_nickname(
        &self,
        token: &str,
        user_id: &str,
        nickname: &str,
    ) -> Result<Option<Profile>> {
        let filters = Query::new().eq("user_id", user_id);
        let body = serde_json::json!({ "nickname": nickname });
        let rows: Vec<Profile> = self
            .client
            .update(PROFILES, &filters, &body, Some(token))
            .await
            .context("updating nickname")?;
        Ok(rows.into_iter().next())
    }

    async fn set_role(&self, token: &str, user_id: &str, role: Role) -> Result<Option<Profile>> {
        let filters = Query::new().eq("user_id", user_id);
        let body = serde_json::json!({ "role": role });
        let rows: Vec<Profile> = self
            .client
            .update(PROFILES, &filters, &body, Some(token))
            .await
            .context("changing role")?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_row_maps_author_fields() {
        let row: SightingRow = serde_json::from_value(serde_json::json!({
            "id": "9f1c",
            "user_id": "u1",
            "region_name": "Jinhae",
            "lat": 35.15,
            "lon": 128.66,
            "species": "cherry",
            "stage": "bloom",
            "date": "2025-03-28",
            "photo_url": null,
            "memo": "Full bloom along the stream",
            "created_at": "2025-03-28T10:00:00Z",
            "profiles": { "nickname": "blossom_fan", "role": "admin" }
        }))
        .unwrap();
        let record = SightingRecord::from(row);
        assert_eq!(record.nickname, "blossom_fan");
        assert!(record.author_privileged);
        assert_eq!(record.note.as_deref(), Some("Full bloom along the stream"));
    }

    #[test]
    fn missing_profile_is_anonymous() {
        let row: SightingRow = serde_json::from_value(serde_json::json!({
            "id": "1", "user_id": "u1", "region_name": "Busan", "lat": 35.1, "lon": 129.0,
            "species": "azalea", "stage": "bud", "date": "2025-04-01", "photo_url": null,
            "memo": null, "created_at": "2025-04-01T00:00:00Z", "profiles": null
        }))
        .unwrap();
        let record = SightingRecord::from(row);
        assert_eq!(record.nickname, "Anonymous");
        assert!(!record.author_privileged);
    }

    #[test]
    fn insert_payload_uses_memo_column() {
        let new = NewSighting {
            user_id: "u1".into(),
            region_name: "Busan".into(),
            lat: 35.1,
            lon: 129.0,
            species: Species::Azalea,
            stage: GrowthStage::Bud,
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            photo_url: None,
            note: Some("first buds".into()),
        };
        let json = serde_json::to_value(SightingInsert::from(&new)).unwrap();
        assert_eq!(json["memo"], "first buds");
        assert_eq!(json["species"], "azalea");
        assert!(json.get("note").is_none());
    }
}
