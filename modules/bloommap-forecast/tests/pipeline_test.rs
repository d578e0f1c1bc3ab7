//! End-to-end pipeline tests: store → filter → classify → project → select.

use bloommap_common::{PredictionKey, PredictionRecord, Species};
use bloommap_forecast::{
    project_predictions, BloomTier, GridProjector, MapProjector, Position, PredictionStore,
    Projector, SelectionController, SelectionState, ViewKind,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()
}

fn prediction(region: &str, species: Species, offset_days: i64, lat: f64, lon: f64) -> PredictionRecord {
    let predicted = today() + Duration::days(offset_days);
    PredictionRecord {
        region_code: region.to_string(),
        region_name: format!("{region} district"),
        lat,
        lon,
        species,
        predicted_date: predicted,
        confidence_low: predicted - Duration::days(3),
        confidence_high: predicted + Duration::days(3),
        model_version: "phenofact-1".to_string(),
        updated_at: Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap(),
    }
}

#[test]
fn cherry_three_days_out_is_imminent_with_countdown() {
    let store = PredictionStore::from_records(vec![prediction("R1", Species::Cherry, 3, 37.5, 127.0)]);

    let projection = project_predictions(&store, Species::Cherry, now(), &MapProjector);

    assert_eq!(projection.descriptors.len(), 1);
    let marker = &projection.descriptors[0];
    assert_eq!(marker.tier, BloomTier::Imminent);
    assert_eq!(marker.summary.days_until_bloom, 3);
    assert_eq!(marker.summary.countdown.as_deref(), Some("D-3"));
    assert_eq!(marker.fill_color, "#FF6B6B");
    assert_eq!(marker.icon, "🌸");
    assert_eq!(marker.position, Position::Geo { lat: 37.5, lon: 127.0 });
}

#[test]
fn duplicate_region_species_yields_one_marker() {
    let store = PredictionStore::from_records(vec![
        prediction("R2", Species::Forsythia, 10, 35.1, 129.0),
        prediction("R2", Species::Forsythia, 12, 35.9, 128.4),
    ]);

    let projection = project_predictions(&store, Species::Forsythia, now(), &MapProjector);

    assert_eq!(projection.descriptors.len(), 1);
    assert_eq!(projection.descriptors[0].position, Position::Geo { lat: 35.1, lon: 129.0 });
}

#[test]
fn map_and_grid_agree_on_status() {
    let store = PredictionStore::from_records(vec![
        prediction("R1", Species::Azalea, -4, 37.0, 127.0),
        prediction("R2", Species::Azalea, 0, 36.0, 127.5),
        prediction("R3", Species::Azalea, 9, 35.0, 128.0),
        prediction("R4", Species::Azalea, 20, 34.0, 126.5),
        prediction("R5", Species::Azalea, 45, 33.5, 126.5),
    ]);
    let grid = GridProjector { columns: 2, limit: None };
    let projectors: [&dyn Projector; 2] = [&MapProjector, &grid];

    let projections: Vec<_> = projectors
        .iter()
        .map(|p| project_predictions(&store, Species::Azalea, now(), *p))
        .collect();

    assert_eq!(projections[0].view, ViewKind::Map);
    assert_eq!(projections[1].view, ViewKind::Grid);
    for (m, g) in projections[0].descriptors.iter().zip(&projections[1].descriptors) {
        assert_eq!(m.key, g.key);
        assert_eq!(m.tier, g.tier);
        assert_eq!(m.summary, g.summary);
    }
    let tiers: Vec<BloomTier> = projections[0].descriptors.iter().map(|d| d.tier).collect();
    assert_eq!(
        tiers,
        vec![
            BloomTier::Passed,
            BloomTier::Imminent,
            BloomTier::Soon,
            BloomTier::Upcoming,
            BloomTier::Distant,
        ]
    );
}

#[test]
fn clicking_a_marker_selects_the_store_record() {
    let store = PredictionStore::from_records(vec![
        prediction("R1", Species::Cherry, 3, 37.5, 127.0),
        prediction("R9", Species::Cherry, 8, 35.2, 129.1),
    ]);
    let projection = project_predictions(&store, Species::Cherry, now(), &MapProjector);
    let mut selection = SelectionController::new();

    selection.select(projection.descriptors[1].key.clone());

    let selected = selection.resolve(&store).expect("selected record");
    assert!(std::ptr::eq(selected, &store.records()[1]));
    assert_eq!(
        selection.state(),
        &SelectionState::Detail(PredictionKey::new("R9", Species::Cherry))
    );
}

#[test]
fn other_species_are_excluded() {
    let store = PredictionStore::from_records(vec![
        prediction("R1", Species::Cherry, 3, 37.5, 127.0),
        prediction("R1", Species::Azalea, 3, 37.5, 127.0),
    ]);
    let projection = project_predictions(&store, Species::Azalea, now(), &MapProjector);
    assert_eq!(projection.descriptors.len(), 1);
    assert_eq!(projection.descriptors[0].icon, "🌺");
}
