//! Contributor ranking.
//!
//! Points are always derived from the sighting list: ten per report. No
//! stored points column is consulted.

use std::cmp::Reverse;
use std::collections::HashMap;

use bloommap_common::SightingRecord;
use chrono::NaiveDate;
use serde::Serialize;

pub const POINTS_PER_REPORT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Expert,
    Explorer,
    Sprout,
    Novice,
}

impl Badge {
    pub fn for_points(points: u32) -> Self {
        [Badge::Expert, Badge::Explorer, Badge::Sprout]
            .into_iter()
            .find(|b| points >= b.min_points())
            .unwrap_or(Badge::Novice)
    }

    /// Lowest point total that earns this badge.
    pub fn min_points(self) -> u32 {
        match self {
            Badge::Expert => 200,
            Badge::Explorer => 100,
            Badge::Sprout => 50,
            Badge::Novice => 0,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Badge::Expert => "🌟",
            Badge::Explorer => "🌸",
            Badge::Sprout => "🌱",
            Badge::Novice => "🔍",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Badge::Expert => "Bloom expert",
            Badge::Explorer => "Bloom explorer",
            Badge::Sprout => "Sprout observer",
            Badge::Novice => "Novice explorer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub rank: usize,
    pub user_id: String,
    pub nickname: String,
    pub reports: u32,
    pub points: u32,
    pub last_report: NaiveDate,
    pub badge: Badge,
}

pub fn points_for(reports: u32) -> u32 {
    reports.saturating_mul(POINTS_PER_REPORT)
}

struct Tally<'a> {
    nickname: &'a str,
    reports: u32,
    last_report: NaiveDate,
}

/// Rank contributors by points, then most recent report, then nickname.
pub fn build_leaderboard(sightings: &[SightingRecord]) -> Vec<Contributor> {
    let mut tallies: HashMap<&str, Tally<'_>> = HashMap::new();
    for s in sightings {
        let submitted = s.created_at.date_naive();
        let tally = tallies.entry(s.user_id.as_str()).or_insert(Tally {
            nickname: &s.nickname,
            reports: 0,
            last_report: submitted,
        });
        tally.reports += 1;
        if submitted >= tally.last_report {
            tally.last_report = submitted;
            tally.nickname = &s.nickname;
        }
    }

    let mut contributors: Vec<Contributor> = tallies
        .into_iter()
        .map(|(user_id, t)| {
            let points = points_for(t.reports);
            Contributor {
                rank: 0,
                user_id: user_id.to_string(),
                nickname: t.nickname.to_string(),
                reports: t.reports,
                points,
                last_report: t.last_report,
                badge: Badge::for_points(points),
            }
        })
        .collect();

    contributors.sort_by(|a, b| {
        (Reverse(a.points), Reverse(a.last_report), &a.nickname, &a.user_id).cmp(&(
            Reverse(b.points),
            Reverse(b.last_report),
            &b.nickname,
            &b.user_id,
        ))
    });
    for (i, c) in contributors.iter_mut().enumerate() {
        c.rank = i + 1;
    }
    contributors
}

/// Reports per user id, for admin listings.
pub fn report_counts(sightings: &[SightingRecord]) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for s in sightings {
        *counts.entry(s.user_id.as_str()).or_insert(0) += 1;
    }
    counts
}
