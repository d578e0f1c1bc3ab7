use bloommap_common::{GrowthStage, SightingRecord, Species};

/// Board filters. Every field is optional; an empty filter matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SightingFilter {
    pub query: Option<String>,
    pub species: Option<Species>,
    pub stage: Option<GrowthStage>,
    /// Exact author user id.
    pub author: Option<String>,
}

impl SightingFilter {
    pub fn is_empty(&self) -> bool {
        self.needle().is_none()
            && self.species.is_none()
            && self.stage.is_none()
            && self.author.is_none()
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, sighting: &SightingRecord) -> bool {
        self.matches_with(self.needle().as_deref(), sighting)
    }

    fn matches_with(&self, needle: Option<&str>, sighting: &SightingRecord) -> bool {
        if let Some(needle) = needle {
            let region = sighting.region_name.to_lowercase();
            let author = sighting.nickname.to_lowercase();
            if !region.contains(needle) && !author.contains(needle) {
                return false;
            }
        }
        if self.species.is_some_and(|s| s != sighting.species) {
            return false;
        }
        if self.stage.is_some_and(|s| s != sighting.stage) {
            return false;
        }
        if self.author.as_deref().is_some_and(|a| a != sighting.user_id) {
            return false;
        }
        true
    }

    /// Matching sightings, order preserved.
    pub fn apply<'a>(&self, sightings: &'a [SightingRecord]) -> Vec<&'a SightingRecord> {
        let needle = self.needle();
        sightings
            .iter()
            .filter(|s| self.matches_with(needle.as_deref(), s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sighting(id: &str, region: &str, nickname: &str, species: Species, stage: GrowthStage) -> SightingRecord {
        SightingRecord {
            id: id.to_string(),
            user_id: format!("user-{nickname}"),
            nickname: nickname.to_string(),
            author_privileged: false,
            region_name: region.to_string(),
            lat: 37.5,
            lon: 127.0,
            species,
            stage,
            date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            photo_url: None,
            note: None,
            created_at: Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<SightingRecord> {
        vec![
            sighting("1", "Yeouido Park", "blossom_fan", Species::Cherry, GrowthStage::Bloom),
            sighting("2", "Namsan", "Spring_News", Species::Forsythia, GrowthStage::Bud),
            sighting("3", "Jinhae", "hunter", Species::Cherry, GrowthStage::Bud),
        ]
    }

    fn ids(out: Vec<&SightingRecord>) -> Vec<&str> {
        out.into_iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let all = sample();
        let filter = SightingFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&all).len(), 3);
    }

    #[test]
    fn query_matches_region_or_author_case_insensitively() {
        let all = sample();
        let by_region = SightingFilter {
            query: Some("YEOUIDO".into()),
            ..Default::default()
        };
        assert_eq!(ids(by_region.apply(&all)), vec!["1"]);

        let by_author = SightingFilter {
            query: Some("spring".into()),
            ..Default::default()
        };
        assert_eq!(ids(by_author.apply(&all)), vec!["2"]);
    }

    #[test]
    fn species_and_stage_combine() {
        let all = sample();
        let filter = SightingFilter {
            query: Some("  ".into()),
            species: Some(Species::Cherry),
            stage: Some(GrowthStage::Bud),
            author: None,
        };
        assert_eq!(ids(filter.apply(&all)), vec!["3"]);
    }

    #[test]
    fn author_matches_user_id_exactly() {
        let all = sample();
        let filter = SightingFilter {
            author: Some("user-hunter".into()),
            ..Default::default()
        };
        assert!(!filter.is_empty());
        assert_eq!(ids(filter.apply(&all)), vec!["3"]);

        let partial = SightingFilter {
            author: Some("user-hunt".into()),
            ..Default::default()
        };
        assert!(partial.apply(&all).is_empty());
    }
}
