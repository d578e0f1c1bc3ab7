//! Turn classified predictions into renderable descriptors.
//!
//! Both views consume the same classified list; a projector only decides
//! where each descriptor sits. Status, color and summary text are derived
//! once in [`describe`].

use std::fmt;
use std::str::FromStr;

use bloommap_common::{PredictionKey, PredictionRecord, Species};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::filter_species;
use crate::format;
use crate::status::{classify, BloomStatus, BloomTier};
use crate::store::PredictionStore;

const DEFAULT_GRID_COLUMNS: usize = 3;
const DEFAULT_GRID_LIMIT: usize = 20;

/// A store record paired with its status for one evaluation of `now`.
#[derive(Debug, Clone, Copy)]
pub struct Classified<'a> {
    pub record: &'a PredictionRecord,
    pub status: BloomStatus,
}

/// Filter, dedup and classify one species.
pub fn classify_species(
    store: &PredictionStore,
    species: Species,
    now: DateTime<Utc>,
) -> Vec<Classified<'_>> {
    filter_species(store.records(), species)
        .into_iter()
        .map(|record| Classified {
            record,
            status: classify(record, now),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Position {
    Geo { lat: f64, lon: f64 },
    Cell { row: usize, column: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub region_name: String,
    pub predicted_date: String,
    pub confidence_window: String,
    pub days_until_bloom: i64,
    pub countdown: Option<String>,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    pub key: PredictionKey,
    pub position: Position,
    pub icon: &'static str,
    pub fill_color: &'static str,
    pub tier: BloomTier,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Map,
    Grid,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Map => "map",
            ViewKind::Grid => "grid",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "map" => Ok(ViewKind::Map),
            "grid" => Ok(ViewKind::Grid),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub view: ViewKind,
    pub descriptors: Vec<Descriptor>,
    /// Items left out by a capped view.
    pub hidden: usize,
}

pub trait Projector {
    fn view(&self) -> ViewKind;

    fn project(&self, items: &[Classified<'_>]) -> Projection;
}

fn describe(item: &Classified<'_>, position: Position) -> Descriptor {
    let record = item.record;
    Descriptor {
        key: record.key(),
        position,
        icon: record.species.info().icon,
        fill_color: item.status.color(),
        tier: item.status.tier,
        summary: Summary {
            region_name: record.region_name.clone(),
            predicted_date: format::month_day(record.predicted_date),
            confidence_window: format::date_range(record.confidence_low, record.confidence_high),
            days_until_bloom: item.status.days,
            countdown: item.status.countdown(),
            status_label: item.status.label(),
        },
    }
}

/// Geographic markers at each record's coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapProjector;

impl Projector for MapProjector {
    fn view(&self) -> ViewKind {
        ViewKind::Map
    }

    fn project(&self, items: &[Classified<'_>]) -> Projection {
        let descriptors = items
            .iter()
            .map(|item| {
                let position = Position::Geo {
                    lat: item.record.lat,
                    lon: item.record.lon,
                };
                describe(item, position)
            })
            .collect();
        Projection {
            view: ViewKind::Map,
            descriptors,
            hidden: 0,
        }
    }
}

/// Card grid fallback, row-major, optionally capped.
#[derive(Debug, Clone, Copy)]
pub struct GridProjector {
    pub columns: usize,
    pub limit: Option<usize>,
}

impl Default for GridProjector {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            limit: Some(DEFAULT_GRID_LIMIT),
        }
    }
}

impl Projector for GridProjector {
    fn view(&self) -> ViewKind {
        ViewKind::Grid
    }

    fn project(&self, items: &[Classified<'_>]) -> Projection {
        let columns = self.columns.max(1);
        let shown = self.limit.unwrap_or(items.len()).min(items.len());
        let descriptors = items[..shown]
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let position = Position::Cell {
                    row: i / columns,
                    column: i % columns,
                };
                describe(item, position)
            })
            .collect();
        Projection {
            view: ViewKind::Grid,
            descriptors,
            hidden: items.len() - shown,
        }
    }
}

/// Full pipeline: filter → classify → project.
pub fn project_predictions(
    store: &PredictionStore,
    species: Species,
    now: DateTime<Utc>,
    projector: &dyn Projector,
) -> Projection {
    let classified = classify_species(store, species, now);
    projector.project(&classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn record(region: &str, offset_days: i64) -> PredictionRecord {
        let base = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let predicted = base + Duration::days(offset_days);
        PredictionRecord {
            region_code: region.to_string(),
            region_name: format!("Region {region}"),
            lat: 37.0,
            lon: 127.0,
            species: Species::Cherry,
            predicted_date: predicted,
            confidence_low: predicted - Duration::days(2),
            confidence_high: predicted + Duration::days(2),
            model_version: "v1".to_string(),
            updated_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn grid_lays_out_row_major_and_reports_hidden() {
        let store = PredictionStore::from_records((0..5).map(|i| record(&format!("R{i}"), i)).collect());
        let grid = GridProjector {
            columns: 2,
            limit: Some(3),
        };
        let projection = project_predictions(&store, Species::Cherry, now(), &grid);
        assert_eq!(projection.descriptors.len(), 3);
        assert_eq!(projection.hidden, 2);
        assert_eq!(projection.descriptors[2].position, Position::Cell { row: 1, column: 0 });
    }

    #[test]
    fn zero_columns_does_not_divide_by_zero() {
        let store = PredictionStore::from_records(vec![record("R1", 1)]);
        let grid = GridProjector {
            columns: 0,
            limit: None,
        };
        let projection = project_predictions(&store, Species::Cherry, now(), &grid);
        assert_eq!(projection.descriptors[0].position, Position::Cell { row: 0, column: 0 });
    }

    #[test]
    fn summary_carries_formatted_dates() {
        let store = PredictionStore::from_records(vec![record("R1", 2)]);
        let projection = project_predictions(&store, Species::Cherry, now(), &MapProjector);
        let summary = &projection.descriptors[0].summary;
        assert_eq!(summary.predicted_date, "April 3");
        assert_eq!(summary.confidence_window, "Apr 1 - Apr 5");
        assert_eq!(summary.countdown.as_deref(), Some("D-2"));
    }

    #[test]
    fn view_kind_parses() {
        assert_eq!("grid".parse::<ViewKind>().unwrap(), ViewKind::Grid);
        assert!("globe".parse::<ViewKind>().is_err());
    }
}
