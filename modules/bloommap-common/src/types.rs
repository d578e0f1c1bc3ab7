use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BloomMapError;

// --- Species ---

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[default]
    Cherry,
    Forsythia,
    Azalea,
}

/// Static presentation data for a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesInfo {
    pub name: &'static str,
    pub local_name: &'static str,
    pub icon: &'static str,
    pub season: &'static str,
    pub duration: &'static str,
    pub feature: &'static str,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Cherry, Species::Forsythia, Species::Azalea];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Cherry => "cherry",
            Species::Forsythia => "forsythia",
            Species::Azalea => "azalea",
        }
    }

    pub fn info(self) -> SpeciesInfo {
        match self {
            Species::Cherry => SpeciesInfo {
                name: "Cherry blossom",
                local_name: "벚꽃",
                icon: "🌸",
                season: "late March to mid April",
                duration: "about 7-10 days",
                feature: "best viewed between 10am and 2pm",
            },
            Species::Forsythia => SpeciesInfo {
                name: "Forsythia",
                local_name: "개나리",
                icon: "🟡",
                season: "early to late March",
                duration: "about 14 days",
                feature: "the first flower to announce spring",
            },
            Species::Azalea => SpeciesInfo {
                name: "Azalea",
                local_name: "진달래",
                icon: "🌺",
                season: "early April to early May",
                duration: "about 10-14 days",
                feature: "mostly observed on mountain slopes",
            },
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = BloomMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cherry" => Ok(Species::Cherry),
            "forsythia" => Ok(Species::Forsythia),
            "azalea" => Ok(Species::Azalea),
            other => Err(BloomMapError::UnknownSpecies(other.to_string())),
        }
    }
}

// --- Growth stage ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Bud,
    Bloom,
}

impl GrowthStage {
    pub fn as_str(self) -> &'static str {
        match self {
            GrowthStage::Bud => "bud",
            GrowthStage::Bloom => "bloom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GrowthStage::Bud => "Budding",
            GrowthStage::Bloom => "In bloom",
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrowthStage {
    type Err = BloomMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bud" => Ok(GrowthStage::Bud),
            "bloom" => Ok(GrowthStage::Bloom),
            other => Err(BloomMapError::UnknownStage(other.to_string())),
        }
    }
}

// --- Predictions ---

/// Identity of a prediction within the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionKey {
    pub region_code: String,
    pub species: Species,
}

impl PredictionKey {
    pub fn new(region_code: impl Into<String>, species: Species) -> Self {
        Self {
            region_code: region_code.into(),
            species,
        }
    }
}

impl fmt::Display for PredictionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.region_code, self.species)
    }
}

/// A single model output row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub region_code: String,
    pub region_name: String,
    pub lat: f64,
    pub lon: f64,
    pub species: Species,
    pub predicted_date: NaiveDate,
    pub confidence_low: NaiveDate,
    pub confidence_high: NaiveDate,
    pub model_version: String,
    pub updated_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn key(&self) -> PredictionKey {
        PredictionKey::new(self.region_code.clone(), self.species)
    }

    pub fn matches_key(&self, key: &PredictionKey) -> bool {
        self.species == key.species && self.region_code == key.region_code
    }
}

// --- Sightings ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingRecord {
    pub id: String,
    pub user_id: String,
    pub nickname: String,
    #[serde(default)]
    pub author_privileged: bool,
    pub region_name: String,
    pub lat: f64,
    pub lon: f64,
    pub species: Species,
    pub stage: GrowthStage,
    pub date: NaiveDate,
    pub photo_url: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Profiles & sessions ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn toggled(self) -> Role {
        match self {
            Role::User => Role::Admin,
            Role::Admin => Role::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub nickname: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The acting user for a request. Passed explicitly to everything that
/// checks ownership or privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    pub id: String,
    pub display_name: String,
    pub is_privileged: bool,
}

impl AuthSession {
    pub fn owns(&self, sighting: &SightingRecord) -> bool {
        self.id == sighting.user_id
    }
}

/// An authenticated session plus the credential the data service expects
/// for writes made on the user's behalf.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session: AuthSession,
    pub access_token: String,
}
