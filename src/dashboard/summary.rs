use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dashboard::filters::{apply_filters, FilterState};
use crate::error::ParseFilterError;
use crate::models::VoterRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_records: u64,
    pub surveyed_count: u64,
    pub voting_done_count: u64,
    pub voting_done_percentage: u8,
}

/// Which records the summary is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsScope {
    /// Only the booth filter narrows the statistics.
    #[default]
    Booth,
    /// Every active filter narrows the statistics.
    Filtered,
}

impl FromStr for StatsScope {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booth" => Ok(StatsScope::Booth),
            "filtered" => Ok(StatsScope::Filtered),
            other => Err(ParseFilterError::new("stats scope", other, "booth, filtered")),
        }
    }
}

pub fn stats_scope<'a>(
    dataset: &'a [VoterRecord],
    filters: &FilterState,
    scope: StatsScope,
) -> Vec<&'a VoterRecord> {
    match scope {
        StatsScope::Booth => dataset
            .iter()
            .filter(|record| filters.matches_booth(record))
            .collect(),
        StatsScope::Filtered => apply_filters(dataset, filters),
    }
}

pub fn compute_stats<'a, I>(records: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a VoterRecord>,
{
    let mut stats = SummaryStats::default();
    for record in records {
        stats.total_records += 1;
        if record.is_surveyed() {
            stats.surveyed_count += 1;
        }
        if record.has_voted() {
            stats.voting_done_count += 1;
        }
    }
    stats.voting_done_percentage = percentage(stats.voting_done_count, stats.total_records);
    stats
}

/// `part / total` as a whole percent, rounding halves up. Zero when `total` is zero.
pub fn percentage(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u128;
    let total = total as u128;
    ((part * 200 + total) / (total * 2)) as u8
}
