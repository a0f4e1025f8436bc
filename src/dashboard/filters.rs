use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseFilterError;
use crate::models::VoterRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotingFilter {
    Done,
    NotDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyFilter {
    Done,
    NotDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferFilter {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotYetFilter {
    Pending,
}

/// Independent predicates over the dataset. Unset slots do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub booth_id: Option<String>,
    pub voting: Option<VotingFilter>,
    pub survey: Option<SurveyFilter>,
    pub transfer: Option<TransferFilter>,
    pub not_yet: Option<NotYetFilter>,
}

impl FilterState {
    /// The active booth, treating an empty string as unset.
    pub fn booth(&self) -> Option<&str> {
        self.booth_id.as_deref().filter(|booth| !booth.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.booth().is_none()
            && self.voting.is_none()
            && self.survey.is_none()
            && self.transfer.is_none()
            && self.not_yet.is_none()
    }

    pub fn matches_booth(&self, record: &VoterRecord) -> bool {
        self.booth().map_or(true, |booth| record.booth_id == booth)
    }

    pub fn matches_voting(&self, record: &VoterRecord) -> bool {
        match self.voting {
            None => true,
            Some(VotingFilter::Done) => record.has_voted(),
            Some(VotingFilter::NotDone) => !record.has_voted(),
        }
    }

    pub fn matches_survey(&self, record: &VoterRecord) -> bool {
        match self.survey {
            None => true,
            Some(SurveyFilter::Done) => record.is_surveyed(),
            Some(SurveyFilter::NotDone) => !record.is_surveyed(),
        }
    }

    pub fn matches_transfer(&self, record: &VoterRecord) -> bool {
        match self.transfer {
            None => true,
            Some(TransferFilter::Yes) => record.is_transferred(),
            Some(TransferFilter::No) => !record.is_transferred(),
        }
    }

    pub fn matches_not_yet(&self, record: &VoterRecord) -> bool {
        match self.not_yet {
            None => true,
            Some(NotYetFilter::Pending) => record.is_not_yet_voted(),
        }
    }

    /// Booth, voting, survey, transfer, then not-yet; the first miss stops.
    pub fn matches(&self, record: &VoterRecord) -> bool {
        self.matches_booth(record)
            && self.matches_voting(record)
            && self.matches_survey(record)
            && self.matches_transfer(record)
            && self.matches_not_yet(record)
    }
}

/// Narrows `dataset` to the records that pass every active filter, keeping
/// the original order of the records.
pub fn apply_filters<'a>(dataset: &'a [VoterRecord], filters: &FilterState) -> Vec<&'a VoterRecord> {
    if filters.is_empty() {
        return dataset.iter().collect();
    }
    dataset.iter().filter(|record| filters.matches(record)).collect()
}

impl FromStr for VotingFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(VotingFilter::Done),
            "not_done" => Ok(VotingFilter::NotDone),
            other => Err(ParseFilterError::new("voting", other, "done, not_done")),
        }
    }
}

impl FromStr for SurveyFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(SurveyFilter::Done),
            "not_done" => Ok(SurveyFilter::NotDone),
            other => Err(ParseFilterError::new("survey", other, "done, not_done")),
        }
    }
}

impl FromStr for TransferFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(TransferFilter::Yes),
            "no" => Ok(TransferFilter::No),
            other => Err(ParseFilterError::new("transfer", other, "yes, no")),
        }
    }
}

impl FromStr for NotYetFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(NotYetFilter::Pending),
            other => Err(ParseFilterError::new("not_yet", other, "pending")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VotingStatus;

    fn voter(id: i64, booth: &str, status: &str, surveyed: bool, flag: &str) -> VoterRecord {
        VoterRecord {
            id,
            booth_id: booth.to_string(),
            voting_status: VotingStatus::from(status),
            surveyed_at: surveyed.then(|| "2024-04-19 09:30:00".to_string()),
            transfer_flag: flag.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<VoterRecord> {
        vec![
            voter(1, "12", "Completed", true, "1"),
            voter(2, "12", "Pending", false, "1"),
            voter(3, "13", "Direct", true, "0"),
            voter(4, "13", "In Transit", false, "1"),
            voter(5, "", "", true, ""),
            voter(6, "12", "In Transit", true, "0"),
        ]
    }

    fn ids(records: &[&VoterRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_filter_passes_everything() {
        let data = sample();
        let filters = FilterState::default();
        assert!(filters.is_empty());
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn empty_booth_string_means_unset() {
        let data = sample();
        let filters = FilterState {
            booth_id: Some(String::new()),
            ..Default::default()
        };
        assert!(filters.is_empty());
        assert_eq!(apply_filters(&data, &filters).len(), data.len());
    }

    #[test]
    fn voting_filter_splits_done_and_not_done() {
        let data = sample();
        let done = FilterState {
            voting: Some(VotingFilter::Done),
            ..Default::default()
        };
        let not_done = FilterState {
            voting: Some(VotingFilter::NotDone),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&data, &done)), vec![1, 3]);
        assert_eq!(ids(&apply_filters(&data, &not_done)), vec![2, 4, 5, 6]);
    }

    #[test]
    fn not_done_on_all_pending_keeps_input() {
        let data: Vec<VoterRecord> = (1..=20).map(|i| voter(i, "7", "Pending", false, "0")).collect();
        let filters = FilterState {
            voting: Some(VotingFilter::NotDone),
            ..Default::default()
        };
        let filtered: Vec<VoterRecord> = apply_filters(&data, &filters).into_iter().cloned().collect();
        assert_eq!(filtered, data);
    }

    #[test]
    fn filters_compose_by_and() {
        let data = sample();
        let filters = FilterState {
            booth_id: Some("12".to_string()),
            survey: Some(SurveyFilter::Done),
            transfer: Some(TransferFilter::No),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![6]);
    }

    #[test]
    fn not_yet_requires_transfer_and_pending_status() {
        let data = sample();
        let filters = FilterState {
            not_yet: Some(NotYetFilter::Pending),
            ..Default::default()
        };
        // 6 is In Transit but never transferred, 1 is transferred but voted.
        assert_eq!(ids(&apply_filters(&data, &filters)), vec![2, 4]);
    }

    #[test]
    fn not_yet_is_its_own_slot() {
        let data = sample();
        let filters = FilterState {
            voting: Some(VotingFilter::Done),
            not_yet: Some(NotYetFilter::Pending),
            ..Default::default()
        };
        assert!(apply_filters(&data, &filters).is_empty());
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let data = sample();
        let cases = [
            FilterState::default(),
            FilterState {
                booth_id: Some("13".to_string()),
                ..Default::default()
            },
            FilterState {
                voting: Some(VotingFilter::NotDone),
                survey: Some(SurveyFilter::NotDone),
                ..Default::default()
            },
            FilterState {
                transfer: Some(TransferFilter::Yes),
                not_yet: Some(NotYetFilter::Pending),
                ..Default::default()
            },
        ];
        for filters in cases {
            let once: Vec<VoterRecord> = apply_filters(&data, &filters).into_iter().cloned().collect();
            let twice: Vec<VoterRecord> = apply_filters(&once, &filters).into_iter().cloned().collect();
            assert_eq!(once, twice, "filters: {:?}", filters);
        }
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("done".parse::<VotingFilter>().unwrap(), VotingFilter::Done);
        assert_eq!("not_done".parse::<SurveyFilter>().unwrap(), SurveyFilter::NotDone);
        assert_eq!("no".parse::<TransferFilter>().unwrap(), TransferFilter::No);
        assert_eq!("pending".parse::<NotYetFilter>().unwrap(), NotYetFilter::Pending);

        let err = "maybe".parse::<TransferFilter>().unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }
}
