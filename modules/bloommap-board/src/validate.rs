//! Checks that run before any request reaches the data service.

use bloommap_common::{GrowthStage, Species};
use chrono::NaiveDate;

use crate::error::{BoardError, ValidationIssue};

pub const NICKNAME_MAX_CHARS: usize = 20;
pub const NOTE_MAX_CHARS: usize = 500;
pub const REGION_MAX_CHARS: usize = 120;

/// Default map center, used when a report carries no coordinates.
pub const DEFAULT_LAT: f64 = 36.5;
pub const DEFAULT_LON: f64 = 127.5;

const ALLOWED_PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

fn earliest_observation() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl PhotoUpload {
    /// File extension for an accepted content type.
    pub fn extension(&self) -> Option<&'static str> {
        ALLOWED_PHOTO_TYPES
            .iter()
            .find(|(ct, _)| *ct == self.content_type)
            .map(|(_, ext)| *ext)
    }
}

/// Raw report form input.
#[derive(Debug, Clone, Default)]
pub struct SightingDraft {
    pub region_name: String,
    pub coordinates: Option<(f64, f64)>,
    pub species: Species,
    pub stage: Option<GrowthStage>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
    pub photo: Option<PhotoUpload>,
}

/// A draft that passed validation.
#[derive(Debug, Clone)]
pub struct ValidSighting {
    pub region_name: String,
    pub lat: f64,
    pub lon: f64,
    pub species: Species,
    pub stage: GrowthStage,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub photo: Option<PhotoUpload>,
}

pub fn validate_draft(
    draft: SightingDraft,
    today: NaiveDate,
    photo_max_bytes: usize,
) -> Result<ValidSighting, BoardError> {
    let mut issues = Vec::new();

    let region_name = draft.region_name.trim().to_string();
    if region_name.is_empty() {
        issues.push(ValidationIssue::new("region_name", "Location is required"));
    } else if region_name.chars().count() > REGION_MAX_CHARS {
        issues.push(ValidationIssue::new(
            "region_name",
            format!("Location must be at most {REGION_MAX_CHARS} characters"),
        ));
    }

    match draft.date {
        None => issues.push(ValidationIssue::new("date", "Observation date is required")),
        Some(date) if date > today => {
            issues.push(ValidationIssue::new("date", "Observation date cannot be in the future"))
        }
        Some(date) if date < earliest_observation() => issues.push(ValidationIssue::new(
            "date",
            "Observation date must be on or after 2020-01-01",
        )),
        Some(_) => {}
    }

    let (lat, lon) = draft.coordinates.unwrap_or((DEFAULT_LAT, DEFAULT_LON));
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        issues.push(ValidationIssue::new("coordinates", "Coordinates are out of range"));
    }

    let note = normalize_note(draft.note);
    if let Err(issue) = check_note(note.as_deref()) {
        issues.push(issue);
    }

    if let Some(photo) = &draft.photo {
        if photo.extension().is_none() {
            issues.push(ValidationIssue::new("photo", "Photo must be a JPEG, PNG or WebP image"));
        }
        if photo.bytes.len() > photo_max_bytes {
            issues.push(ValidationIssue::new(
                "photo",
                format!("Photo must be at most {} MB", photo_max_bytes / (1024 * 1024)),
            ));
        }
        if photo.bytes.is_empty() {
            issues.push(ValidationIssue::new("photo", "Photo is empty"));
        }
    }

    if !issues.is_empty() {
        return Err(BoardError::Validation(issues));
    }

    Ok(ValidSighting {
        region_name,
        lat,
        lon,
        species: draft.species,
        stage: draft.stage.unwrap_or(GrowthStage::Bloom),
        // Checked above.
        date: draft.date.unwrap_or(today),
        note,
        photo: draft.photo,
    })
}

/// Blank notes are stored as no note.
pub fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

fn check_note(note: Option<&str>) -> Result<(), ValidationIssue> {
    match note {
        Some(n) if n.chars().count() > NOTE_MAX_CHARS => Err(ValidationIssue::new(
            "note",
            format!("Note must be at most {NOTE_MAX_CHARS} characters"),
        )),
        _ => Ok(()),
    }
}

pub fn validate_note(note: Option<String>) -> Result<Option<String>, BoardError> {
    let note = normalize_note(note);
    check_note(note.as_deref()).map_err(|issue| BoardError::Validation(vec![issue]))?;
    Ok(note)
}

pub fn validate_nickname(nickname: &str) -> Result<String, BoardError> {
    let nickname = nickname.trim();
    let issue = if nickname.is_empty() {
        ValidationIssue::new("nickname", "Nickname is required")
    } else if nickname.chars().count() > NICKNAME_MAX_CHARS {
        ValidationIssue::new(
            "nickname",
            format!("Nickname must be at most {NICKNAME_MAX_CHARS} characters"),
        )
    } else {
        return Ok(nickname.to_string());
    };
    Err(BoardError::Validation(vec![issue]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn draft() -> SightingDraft {
        SightingDraft {
            region_name: "Yeouido Park".to_string(),
            date: Some(NaiveDate::from_ymd_opt(2025, 4, 8).unwrap()),
            ..Default::default()
        }
    }

    fn issue_fields(err: BoardError) -> Vec<&'static str> {
        match err {
            BoardError::Validation(issues) => issues.into_iter().map(|i| i.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_minimal_draft_with_defaults() {
        let valid = validate_draft(draft(), today(), 1024).unwrap();
        assert_eq!(valid.stage, GrowthStage::Bloom);
        assert_eq!((valid.lat, valid.lon), (DEFAULT_LAT, DEFAULT_LON));
        assert_eq!(valid.note, None);
    }

    #[test]
    fn rejects_blank_region_and_missing_date_together() {
        let d = SightingDraft {
            region_name: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(issue_fields(validate_draft(d, today(), 1024).unwrap_err()), vec!["region_name", "date"]);
    }

    #[test]
    fn rejects_future_and_ancient_dates() {
        let mut d = draft();
        d.date = Some(NaiveDate::from_ymd_opt(2025, 4, 11).unwrap());
        assert_eq!(issue_fields(validate_draft(d, today(), 1024).unwrap_err()), vec!["date"]);

        let mut d = draft();
        d.date = Some(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
        assert_eq!(issue_fields(validate_draft(d, today(), 1024).unwrap_err()), vec!["date"]);
    }

    #[test]
    fn rejects_oversized_or_unknown_photo() {
        let mut d = draft();
        d.photo = Some(PhotoUpload {
            bytes: vec![0; 2048],
            content_type: "image/gif".to_string(),
        });
        assert_eq!(issue_fields(validate_draft(d, today(), 1024).unwrap_err()), vec!["photo", "photo"]);
    }

    #[test]
    fn blank_note_becomes_none() {
        let mut d = draft();
        d.note = Some("  \n ".to_string());
        assert_eq!(validate_draft(d, today(), 1024).unwrap().note, None);
    }

    #[test]
    fn nickname_limits() {
        assert_eq!(validate_nickname("  꽃사랑이 ").unwrap(), "꽃사랑이");
        assert!(validate_nickname("").is_err());
        assert!(validate_nickname(&"a".repeat(21)).is_err());
    }

    #[test]
    fn long_note_is_rejected() {
        assert!(validate_note(Some("x".repeat(NOTE_MAX_CHARS + 1))).is_err());
        assert_eq!(validate_note(Some(" ok ".into())).unwrap().as_deref(), Some("ok"));
    }
}
