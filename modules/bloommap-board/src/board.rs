use std::sync::Arc;

use bloommap_common::{AuthContext, AuthSession, Profile, SightingRecord};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{NewSighting, SightingBackend};
use crate::error::BoardError;
use crate::filter::SightingFilter;
use crate::leaderboard::{build_leaderboard, points_for, report_counts, Contributor};
use crate::permissions::{can_delete, can_edit, can_moderate};
use crate::validate::{validate_draft, validate_nickname, validate_note, SightingDraft};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    #[serde(flatten)]
    pub profile: Profile,
    pub reports: u32,
    pub points: u32,
}

/// Board operations. Permission and validation checks happen here, before
/// any write reaches the backend.
#[derive(Clone)]
pub struct Board {
    backend: Arc<dyn SightingBackend>,
    photo_max_bytes: usize,
}

impl Board {
    pub fn new(backend: Arc<dyn SightingBackend>, photo_max_bytes: usize) -> Self {
        Self {
            backend,
            photo_max_bytes,
        }
    }

    /// Build the session for an authenticated user id. Privilege and the
    /// display name come from the profile table, not the token.
    pub async fn session_for(
        &self,
        user_id: &str,
        fallback_name: Option<&str>,
    ) -> Result<AuthSession, BoardError> {
        let profile = self.backend.get_profile(user_id).await?;
        let (display_name, is_privileged) = match profile {
            Some(p) => (p.nickname, p.role.is_privileged()),
            None => (fallback_name.unwrap_or("Anonymous").to_string(), false),
        };
        Ok(AuthSession {
            id: user_id.to_string(),
            display_name,
            is_privileged,
        })
    }

    pub async fn list(&self, filter: &SightingFilter) -> Result<Vec<SightingRecord>, BoardError> {
        let all = self.backend.list_sightings().await?;
        if filter.is_empty() {
            return Ok(all);
        }
        Ok(all.into_iter().filter(|s| filter.matches(s)).collect())
    }

    pub async fn lookup(&self, id: &str) -> Result<Option<SightingRecord>, BoardError> {
        Ok(self.backend.get_sighting(id).await?)
    }

    pub async fn submit(
        &self,
        ctx: &AuthContext,
        draft: SightingDraft,
        today: NaiveDate,
    ) -> Result<SightingRecord, BoardError> {
        let valid = validate_draft(draft, today, self.photo_max_bytes)?;
        let author = &ctx.session.id;

        let photo_url = match valid.photo {
            Some(photo) => {
                let ext = photo.extension().unwrap_or("bin");
                let path = format!("{author}/{}.{ext}", Uuid::new_v4());
                let url = self
                    .backend
                    .upload_photo(&ctx.access_token, &path, photo.bytes, &photo.content_type)
                    .await?;
                Some(url)
            }
            None => None,
        };

        let new = NewSighting {
            user_id: author.clone(),
            region_name: valid.region_name,
            lat: valid.lat,
            lon: valid.lon,
            species: valid.species,
            stage: valid.stage,
            date: valid.date,
            photo_url,
            note: valid.note,
        };

        let record = match self.backend.insert_sighting(&ctx.access_token, &new).await {
            Ok(record) => record,
            Err(e) => {
                if let Some(url) = &new.photo_url {
                    warn!(photo_url = %url, "Sighting insert failed after photo upload; photo is orphaned");
                }
                return Err(e.into());
            }
        };

        info!(
            sighting_id = %record.id,
            user_id = %author,
            species = %record.species,
            has_photo = record.photo_url.is_some(),
            "Sighting submitted"
        );
        Ok(record)
    }

    async fn require_existing(&self, id: &str) -> Result<SightingRecord, BoardError> {
        self.backend
            .get_sighting(id)
            .await?
            .ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    pub async fn edit_note(
        &self,
        ctx: &AuthContext,
        id: &str,
        note: Option<String>,
    ) -> Result<SightingRecord, BoardError> {
        let note = validate_note(note)?;
        let existing = self.require_existing(id).await?;
        if !can_edit(&ctx.session, &existing) {
            return Err(BoardError::Forbidden("only the author can edit a note"));
        }

        let updated = self
            .backend
            .update_note(&ctx.access_token, id, note.as_deref())
            .await?
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;

        info!(sighting_id = %id, user_id = %ctx.session.id, "Sighting note updated");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<(), BoardError> {
        let existing = self.require_existing(id).await?;
        if !can_delete(&ctx.session, &existing) {
            return Err(BoardError::Forbidden(
                "only the author or a moderator can delete a sighting",
            ));
        }

        if !self.backend.delete_sighting(&ctx.access_token, id).await? {
            return Err(BoardError::NotFound(id.to_string()));
        }

        info!(
            sighting_id = %id,
            user_id = %ctx.session.id,
            moderated = !ctx.session.owns(&existing),
            "Sighting deleted"
        );
        Ok(())
    }

    pub async fn leaderboard(&self) -> Result<Vec<Contributor>, BoardError> {
        let sightings = self.backend.list_sightings().await?;
        Ok(build_leaderboard(&sightings))
    }

    pub async fn update_nickname(
        &self,
        ctx: &AuthContext,
        nickname: &str,
    ) -> Result<Profile, BoardError> {
        let nickname = validate_nickname(nickname)?;
        let profile = self
            .backend
            .update_nickname(&ctx.access_token, &ctx.session.id, &nickname)
            .await?
            .ok_or_else(|| BoardError::NotFound(format!("profile {}", ctx.session.id)))?;
        info!(user_id = %ctx.session.id, "Nickname updated");
        Ok(profile)
    }

    /// The caller's own profile with derived report counts.
    pub async fn own_profile(&self, ctx: &AuthContext) -> Result<ProfileSummary, BoardError> {
        let (profile, sightings) = futures::try_join!(
            self.backend.get_profile(&ctx.session.id),
            self.backend.list_sightings(),
        )?;
        let profile =
            profile.ok_or_else(|| BoardError::NotFound(format!("profile {}", ctx.session.id)))?;
        let reports = report_counts(&sightings)
            .get(ctx.session.id.as_str())
            .copied()
            .unwrap_or(0);
        Ok(ProfileSummary {
            profile,
            reports,
            points: points_for(reports),
        })
    }

    pub async fn profiles(&self, ctx: &AuthContext) -> Result<Vec<ProfileSummary>, BoardError> {
        if !can_moderate(&ctx.session) {
            return Err(BoardError::Forbidden("admin access required"));
        }
        let (profiles, sightings) = futures::try_join!(
            self.backend.list_profiles(&ctx.access_token),
            self.backend.list_sightings(),
        )?;
        let counts = report_counts(&sightings);
        Ok(profiles
            .into_iter()
            .map(|profile| {
                let reports = counts.get(profile.user_id.as_str()).copied().unwrap_or(0);
                ProfileSummary {
                    profile,
                    reports,
                    points: points_for(reports),
                }
            })
            .collect())
    }

    /// Flip a user between ordinary and admin.
    pub async fn toggle_role(&self, ctx: &AuthContext, user_id: &str) -> Result<Profile, BoardError> {
        if !can_moderate(&ctx.session) {
            return Err(BoardError::Forbidden("admin access required"));
        }
        let current = self
            .backend
            .get_profile(user_id)
            .await?
            .ok_or_else(|| BoardError::NotFound(format!("profile {user_id}")))?;
        let role = current.role.toggled();
        let updated = self
            .backend
            .set_role(&ctx.access_token, user_id, role)
            .await?
            .ok_or_else(|| BoardError::NotFound(format!("profile {user_id}")))?;
        info!(target_user = %user_id, by = %ctx.session.id, ?role, "Role changed");
        Ok(updated)
    }
}

/// A locally held sighting list that only changes after the backend
/// confirms a write.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    sightings: Vec<SightingRecord>,
}

impl BoardState {
    pub async fn load(board: &Board) -> Result<Self, BoardError> {
        let sightings = board.list(&SightingFilter::default()).await?;
        Ok(Self { sightings })
    }

    pub fn items(&self) -> &[SightingRecord] {
        &self.sightings
    }

    pub fn visible(&self, filter: &SightingFilter) -> Vec<&SightingRecord> {
        filter.apply(&self.sightings)
    }

    pub fn find(&self, id: &str) -> Option<&SightingRecord> {
        self.sightings.iter().find(|s| s.id == id)
    }

    pub async fn submit(
        &mut self,
        board: &Board,
        ctx: &AuthContext,
        draft: SightingDraft,
        today: NaiveDate,
    ) -> Result<&SightingRecord, BoardError> {
        let record = board.submit(ctx, draft, today).await?;
        self.sightings.insert(0, record);
        Ok(&self.sightings[0])
    }

    pub async fn edit_note(
        &mut self,
        board: &Board,
        ctx: &AuthContext,
        id: &str,
        note: Option<String>,
    ) -> Result<(), BoardError> {
        let updated = board.edit_note(ctx, id, note).await?;
        if let Some(slot) = self.sightings.iter_mut().find(|s| s.id == updated.id) {
            *slot = updated;
        }
        Ok(())
    }

    pub async fn delete(&mut self, board: &Board, ctx: &AuthContext, id: &str) -> Result<(), BoardError> {
        board.delete(ctx, id).await?;
        self.sightings.retain(|s| s.id != id);
        Ok(())
    }
}
