//! Bloom status classification.
//!
//! Days-until-bloom is the ceiling of the millisecond distance from `now`
//! to UTC midnight of the predicted date, so a bloom later today counts as
//! day 0 and anything already behind `now` by a full day or more goes
//! negative.

use bloommap_common::PredictionRecord;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const VIEWING_LEAD_DAYS: i64 = 3;
const VIEWING_TAIL_DAYS: i64 = 5;
const BLOOMING_RADIUS_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BloomTier {
    Passed,
    Imminent,
    Soon,
    Upcoming,
    Distant,
}

impl BloomTier {
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => BloomTier::Passed,
            0..=6 => BloomTier::Imminent,
            7..=13 => BloomTier::Soon,
            14..=29 => BloomTier::Upcoming,
            _ => BloomTier::Distant,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BloomTier::Passed => "#888888",
            BloomTier::Imminent => "#FF6B6B",
            BloomTier::Soon => "#FFE66D",
            BloomTier::Upcoming => "#4ECDC4",
            BloomTier::Distant => "#45B7D1",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BloomTier::Passed => "Bloom passed",
            BloomTier::Imminent => "Bloom imminent",
            BloomTier::Soon => "Blooming soon",
            BloomTier::Upcoming => "Bloom upcoming",
            BloomTier::Distant => "Bloom expected",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BloomTier::Passed => "passed",
            BloomTier::Imminent => "imminent",
            BloomTier::Soon => "soon",
            BloomTier::Upcoming => "upcoming",
            BloomTier::Distant => "distant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BloomStatus {
    pub days: i64,
    pub tier: BloomTier,
}

impl BloomStatus {
    pub fn from_days(days: i64) -> Self {
        Self {
            days,
            tier: BloomTier::from_days(days),
        }
    }

    /// `D-3`, `D-Day`, or nothing once the bloom has passed.
    pub fn countdown(&self) -> Option<String> {
        match self.days {
            d if d > 0 => Some(format!("D-{d}")),
            0 => Some("D-Day".to_string()),
            _ => None,
        }
    }

    pub fn color(&self) -> &'static str {
        self.tier.color()
    }

    pub fn label(&self) -> &'static str {
        self.tier.label()
    }
}

fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator > 0 {
        quotient + 1
    } else {
        quotient
    }
}

pub fn days_until_bloom(predicted: NaiveDate, now: DateTime<Utc>) -> i64 {
    let diff_ms = (utc_midnight(predicted) - now).num_milliseconds();
    ceil_div(diff_ms, DAY_MS)
}

pub fn classify(record: &PredictionRecord, now: DateTime<Utc>) -> BloomStatus {
    BloomStatus::from_days(days_until_bloom(record.predicted_date, now))
}

/// Suggested viewing dates around a predicted bloom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewingWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

pub fn viewing_window(predicted: NaiveDate) -> ViewingWindow {
    ViewingWindow {
        earliest: predicted - Duration::days(VIEWING_LEAD_DAYS),
        latest: predicted + Duration::days(VIEWING_TAIL_DAYS),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpeciesStats {
    pub total: usize,
    pub blooming: usize,
}

/// Count records and how many sit within a week of their predicted date,
/// on either side.
pub fn species_stats<'a, I>(records: I, now: DateTime<Utc>) -> SpeciesStats
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    records
        .into_iter()
        .fold(SpeciesStats::default(), |mut stats, record| {
            stats.total += 1;
            let diff_ms = (utc_midnight(record.predicted_date) - now)
                .num_milliseconds()
                .abs();
            if ceil_div(diff_ms, DAY_MS) <= BLOOMING_RADIUS_DAYS {
                stats.blooming += 1;
            }
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn same_day_is_day_zero_and_imminent() {
        let days = days_until_bloom(date(2025, 4, 3), at(2025, 4, 3, 0));
        assert_eq!(days, 0);
        assert_eq!(BloomTier::from_days(days), BloomTier::Imminent);
    }

    #[test]
    fn later_on_the_predicted_day_still_counts_as_zero() {
        assert_eq!(days_until_bloom(date(2025, 4, 3), at(2025, 4, 3, 15)), 0);
    }

    #[test]
    fn partial_days_round_up() {
        assert_eq!(days_until_bloom(date(2025, 4, 3), at(2025, 4, 1, 12)), 2);
    }

    #[test]
    fn past_dates_are_negative_and_passed() {
        let status = BloomStatus::from_days(days_until_bloom(date(2025, 4, 1), at(2025, 4, 3, 12)));
        assert_eq!(status.days, -2);
        assert_eq!(status.tier, BloomTier::Passed);
        assert_eq!(status.color(), "#888888");
        assert_eq!(status.countdown(), None);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(BloomTier::from_days(-1), BloomTier::Passed);
        assert_eq!(BloomTier::from_days(6), BloomTier::Imminent);
        assert_eq!(BloomTier::from_days(7), BloomTier::Soon);
        assert_eq!(BloomTier::from_days(13), BloomTier::Soon);
        assert_eq!(BloomTier::from_days(14), BloomTier::Upcoming);
        assert_eq!(BloomTier::from_days(29), BloomTier::Upcoming);
        assert_eq!(BloomTier::from_days(30), BloomTier::Distant);
        assert_eq!(BloomTier::from_days(i64::MAX), BloomTier::Distant);
        assert_eq!(BloomTier::from_days(i64::MIN), BloomTier::Passed);
    }

    #[test]
    fn countdown_labels() {
        assert_eq!(BloomStatus::from_days(3).countdown().as_deref(), Some("D-3"));
        assert_eq!(BloomStatus::from_days(0).countdown().as_deref(), Some("D-Day"));
    }

    #[test]
    fn viewing_window_spans_three_before_five_after() {
        let window = viewing_window(date(2025, 4, 3));
        assert_eq!(window.earliest, date(2025, 3, 31));
        assert_eq!(window.latest, date(2025, 4, 8));
    }
}
