use std::collections::HashSet;

use bloommap_common::{PredictionRecord, Species};

/// Drop records whose `(region_code, species)` was already seen.
/// Stable: the first occurrence in input order wins.
pub fn dedup_by_key<'a, I>(records: I) -> Vec<&'a PredictionRecord>
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    let mut seen: HashSet<(&'a str, Species)> = HashSet::new();
    records
        .into_iter()
        .filter(|&r| seen.insert((r.region_code.as_str(), r.species)))
        .collect()
}

/// Records for one species, deduplicated, in input order.
///
/// Returns references into the caller's list so downstream consumers keep
/// the record's identity rather than a copy.
pub fn filter_species<'a, I>(records: I, species: Species) -> Vec<&'a PredictionRecord>
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    dedup_by_key(records.into_iter().filter(|r| r.species == species))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(region: &str, species: Species, lat: f64) -> PredictionRecord {
        let date = NaiveDate::from_ymd_opt(2025, 4, 3).unwrap();
        PredictionRecord {
            region_code: region.to_string(),
            region_name: format!("Region {region}"),
            lat,
            lon: 127.0,
            species,
            predicted_date: date,
            confidence_low: date,
            confidence_high: date,
            model_version: "v1".to_string(),
            updated_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn keeps_only_requested_species() {
        let records = vec![
            record("R1", Species::Cherry, 37.0),
            record("R2", Species::Azalea, 36.0),
            record("R3", Species::Cherry, 35.0),
        ];
        let cherry = filter_species(&records, Species::Cherry);
        let codes: Vec<&str> = cherry.iter().map(|r| r.region_code.as_str()).collect();
        assert_eq!(codes, vec!["R1", "R3"]);
    }

    #[test]
    fn duplicate_key_keeps_first() {
        let records = vec![
            record("R2", Species::Forsythia, 37.0),
            record("R2", Species::Forsythia, 38.5),
        ];
        let out = filter_species(&records, Species::Forsythia);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].lat, 37.0);
        assert!(std::ptr::eq(out[0], &records[0]));
    }

    #[test]
    fn same_region_different_species_is_not_a_duplicate() {
        let records = vec![
            record("R1", Species::Cherry, 37.0),
            record("R1", Species::Azalea, 37.0),
        ];
        assert_eq!(dedup_by_key(&records).len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = vec![
            record("R1", Species::Cherry, 37.0),
            record("R1", Species::Cherry, 37.5),
            record("R2", Species::Azalea, 36.0),
            record("R3", Species::Cherry, 35.0),
        ];
        let once = filter_species(&records, Species::Cherry);
        let twice = filter_species(once.iter().copied(), Species::Cherry);
        assert_eq!(once, twice);
    }
}
