use std::collections::HashSet;
use std::path::Path;

use bloommap_common::{BloomMapError, PredictionKey, PredictionRecord};
use tracing::{info, warn};

/// Read-only prediction dataset, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct PredictionStore {
    records: Vec<PredictionRecord>,
}

impl PredictionStore {
    pub fn from_records(records: Vec<PredictionRecord>) -> Self {
        let duplicates = count_duplicate_keys(&records);
        if duplicates > 0 {
            // Kept as-is; the species filter drops later occurrences.
            warn!(duplicates, "Prediction dataset contains duplicate region/species keys");
        }
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, BloomMapError> {
        let records: Vec<PredictionRecord> =
            serde_json::from_str(json).map_err(|e| BloomMapError::Dataset(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BloomMapError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BloomMapError::Dataset(format!("failed to read {}: {e}", path.display()))
        })?;
        let store = Self::from_json(&raw)?;
        info!(path = %path.display(), records = store.len(), "Loaded prediction dataset");
        Ok(store)
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    /// First record in dataset order with this key.
    pub fn get(&self, key: &PredictionKey) -> Option<&PredictionRecord> {
        self.records.iter().find(|r| r.matches_key(key))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn count_duplicate_keys(records: &[PredictionRecord]) -> usize {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| !seen.insert((r.region_code.as_str(), r.species)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloommap_common::Species;

    const DATASET: &str = r#"[
        {"region_code":"R1","region_name":"Jongno","lat":37.57,"lon":126.98,"species":"cherry",
         "predicted_date":"2025-04-03","confidence_low":"2025-03-30","confidence_high":"2025-04-07",
         "model_version":"v1","updated_at":"2025-03-01T00:00:00Z"},
        {"region_code":"R1","region_name":"Jongno (dup)","lat":37.60,"lon":127.00,"species":"cherry",
         "predicted_date":"2025-04-05","confidence_low":"2025-04-01","confidence_high":"2025-04-09",
         "model_version":"v1","updated_at":"2025-03-01T00:00:00Z"}
    ]"#;

    #[test]
    fn get_returns_first_occurrence() {
        let store = PredictionStore::from_json(DATASET).unwrap();
        assert_eq!(store.len(), 2);
        let found = store.get(&PredictionKey::new("R1", Species::Cherry)).unwrap();
        assert_eq!(found.region_name, "Jongno");
        assert!(store.get(&PredictionKey::new("R1", Species::Azalea)).is_none());
    }

    #[test]
    fn malformed_json_is_a_dataset_error() {
        let err = PredictionStore::from_json("{not json").unwrap_err();
        assert!(matches!(err, BloomMapError::Dataset(_)));
    }

    #[test]
    fn missing_file_is_a_dataset_error() {
        let err = PredictionStore::load("/nonexistent/predictions.json").unwrap_err();
        assert!(matches!(err, BloomMapError::Dataset(_)));
    }

    #[test]
    fn counts_duplicate_keys() {
        let store = PredictionStore::from_json(DATASET).unwrap();
        assert_eq!(count_duplicate_keys(store.records()), 1);
    }
}
