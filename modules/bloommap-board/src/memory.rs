//! In-process backend for tests.
//!
//! Tokens are user ids unless registered with `register_token`. Ownership
//! rules mirror the row-level security the hosted tables apply: authors may
//! change their own rows, admins may delete any row and change roles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;
use bloommap_common::{Profile, Role, SightingRecord};
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::{NewSighting, SightingBackend};

#[derive(Default)]
struct Tables {
    sightings: Vec<SightingRecord>,
    profiles: Vec<Profile>,
    photos: Vec<String>,
    tokens: HashMap<String, String>,
}

impl Tables {
    fn user_for<'a>(&'a self, token: &'a str) -> &'a str {
        self.tokens.get(token).map(String::as_str).unwrap_or(token)
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_profile(self, user_id: &str, nickname: &str, role: Role) -> Self {
        self.tables.lock().await.profiles.push(Profile {
            user_id: user_id.to_string(),
            nickname: nickname.to_string(),
            role,
            created_at: Utc::now(),
        });
        self
    }

    /// Seed a row directly, bypassing validation. Newest-first order is kept.
    pub async fn seed(&self, sighting: SightingRecord) {
        let mut tables = self.tables.lock().await;
        tables.sightings.push(sighting);
        tables.sightings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    /// Treat `token` as a credential for `user_id`.
    pub async fn register_token(&self, token: &str, user_id: &str) {
        self.tables
            .lock()
            .await
            .tokens
            .insert(token.to_string(), user_id.to_string());
    }

    /// Make every subsequent write fail as a network error would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read fail, including profile lookups.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of write calls that reached the backend, failed or not.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn photo_paths(&self) -> Vec<String> {
        self.tables.lock().await.photos.clone()
    }

    fn begin_write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("simulated network failure");
        }
        Ok(())
    }

    fn begin_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("simulated network failure");
        }
        Ok(())
    }
}

fn is_admin(tables: &Tables, user_id: &str) -> bool {
    tables
        .profiles
        .iter()
        .any(|p| p.user_id == user_id && p.role.is_privileged())
}

fn author_of<'a>(tables: &'a Tables, user_id: &str) -> Option<&'a Profile> {
    tables.profiles.iter().find(|p| p.user_id == user_id)
}

#[async_trait]
impl SightingBackend for MemoryBackend {
    async fn list_sightings(&self) -> Result<Vec<SightingRecord>> {
        self.begin_read()?;
        Ok(self.tables.lock().await.sightings.clone())
    }

    async fn get_sighting(&self, id: &str) -> Result<Option<SightingRecord>> {
        self.begin_read()?;
        let tables = self.tables.lock().await;
        Ok(tables.sightings.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_sighting(&self, token: &str, new: &NewSighting) -> Result<SightingRecord> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        if tables.user_for(token) != new.user_id {
            bail!("row-level security: user_id does not match token");
        }
        let (nickname, author_privileged) = match author_of(&tables, &new.user_id) {
            Some(p) => (p.nickname.clone(), p.role.is_privileged()),
            None => ("Anonymous".to_string(), false),
        };
        let record = SightingRecord {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id.clone(),
            nickname,
            author_privileged,
            region_name: new.region_name.clone(),
            lat: new.lat,
            lon: new.lon,
            species: new.species,
            stage: new.stage,
            date: new.date,
            photo_url: new.photo_url.clone(),
            note: new.note.clone(),
            created_at: Utc::now(),
        };
        tables.sightings.insert(0, record.clone());
        Ok(record)
    }

    async fn update_note(
        &self,
        token: &str,
        id: &str,
        note: Option<&str>,
    ) -> Result<Option<SightingRecord>> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        let user = tables.user_for(token).to_string();
        let row = tables
            .sightings
            .iter_mut()
            .find(|s| s.id == id && s.user_id == user);
        Ok(row.map(|s| {
            s.note = note.map(str::to_string);
            s.clone()
        }))
    }

    async fn delete_sighting(&self, token: &str, id: &str) -> Result<bool> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        let user = tables.user_for(token).to_string();
        let admin = is_admin(&tables, &user);
        let before = tables.sightings.len();
        tables
            .sightings
            .retain(|s| !(s.id == id && (admin || s.user_id == user)));
        Ok(tables.sightings.len() < before)
    }

    async fn upload_photo(
        &self,
        _token: &str,
        path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        self.begin_write()?;
        self.tables.lock().await.photos.push(path.to_string());
        Ok(format!("memory://photos/{path}"))
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.begin_read()?;
        Ok(author_of(&*self.tables.lock().await, user_id).cloned())
    }

    async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>> {
        self.begin_read()?;
        let tables = self.tables.lock().await;
        if !is_admin(&tables, tables.user_for(token)) {
            return Ok(Vec::new());
        }
        let mut profiles = tables.profiles.clone();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn update_nickname(
        &self,
        token: &str,
        user_id: &str,
        nickname: &str,
    ) -> Result<Option<Profile>> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        if tables.user_for(token) != user_id {
            return Ok(None);
        }
        let updated = tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .map(|p| {
                p.nickname = nickname.to_string();
                p.clone()
            });
        if updated.is_some() {
            for s in tables.sightings.iter_mut().filter(|s| s.user_id == user_id) {
                s.nickname = nickname.to_string();
            }
        }
        Ok(updated)
    }

    async fn set_role(&self, token: &str, user_id: &str, role: Role) -> Result<Option<Profile>> {
        self.begin_write()?;
        let mut tables = self.tables.lock().await;
        if !is_admin(&tables, tables.user_for(token)) {
            return Ok(None);
        }
        Ok(tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .map(|p| {
                p.role = role;
                p.clone()
            }))
    }
}
