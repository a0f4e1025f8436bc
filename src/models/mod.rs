use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::dashboard::pagination::PaginationMeta;

/// One row of the voters table as served by `GET /voters`.
///
/// Every field falls back to its default when missing, null or of the wrong
/// type so that a malformed row still renders and still counts towards the
/// aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoterRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub voter_card_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub relative_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub mobile: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub booth_id: String,
    pub voting_status: VotingStatus,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub surveyed_at: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub transfer_flag: String,
}

impl VoterRecord {
    /// Surveyed once the survey timestamp has been filled in.
    pub fn is_surveyed(&self) -> bool {
        self.surveyed_at.as_deref().map_or(false, |s| !s.is_empty())
    }

    pub fn has_voted(&self) -> bool {
        self.voting_status.is_done()
    }

    pub fn is_transferred(&self) -> bool {
        self.transfer_flag == "1"
    }

    /// Transferred but the vote has not been cast yet.
    pub fn is_not_yet_voted(&self) -> bool {
        self.is_transferred()
            && matches!(
                self.voting_status,
                VotingStatus::Pending | VotingStatus::InTransit
            )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum VotingStatus {
    Completed,
    Direct,
    Pending,
    InTransit,
    #[default]
    Unset,
    Other(String),
}

impl VotingStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, VotingStatus::Completed | VotingStatus::Direct)
    }

    pub fn as_str(&self) -> &str {
        match self {
            VotingStatus::Completed => "Completed",
            VotingStatus::Direct => "Direct",
            VotingStatus::Pending => "Pending",
            VotingStatus::InTransit => "In Transit",
            VotingStatus::Unset => "",
            VotingStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for VotingStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "Completed" => VotingStatus::Completed,
            "Direct" => VotingStatus::Direct,
            "Pending" => VotingStatus::Pending,
            "In Transit" => VotingStatus::InTransit,
            "" => VotingStatus::Unset,
            other => VotingStatus::Other(other.to_string()),
        }
    }
}

impl From<Option<String>> for VotingStatus {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(VotingStatus::from).unwrap_or_default()
    }
}

impl From<VotingStatus> for String {
    fn from(status: VotingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl<'de> Deserialize<'de> for VotingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_opt_string(deserializer).map(VotingStatus::from)
    }
}

// Nullable columns come through as null, and older exports carry flags and
// booth numbers as JSON numbers.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(_) | Value::Object(_) => None,
        other => Some(other.to_string()),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// Envelope returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoterPage {
    #[serde(deserialize_with = "lenient_records")]
    pub data: Vec<VoterRecord>,
    pub pagination: PaginationMeta,
}

// A row that is not even an object still occupies a slot in the dataset.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<VoterRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            VoterRecord::deserialize(row).unwrap_or_else(|e| {
                warn!("Voter row {} is malformed, using defaults: {}", index, e);
                VoterRecord::default()
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record: VoterRecord = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.booth_id, "");
        assert_eq!(record.voting_status, VotingStatus::Unset);
        assert!(!record.is_surveyed());
        assert!(!record.is_transferred());
    }

    #[test]
    fn numeric_transfer_flag_is_stringified() {
        let record: VoterRecord =
            serde_json::from_str(r#"{"id": 1, "transfer_flag": 1, "voting_status": "In Transit"}"#)
                .unwrap();
        assert_eq!(record.transfer_flag, "1");
        assert!(record.is_not_yet_voted());

        let record: VoterRecord =
            serde_json::from_str(r#"{"id": 2, "transfer_flag": null, "voting_status": null}"#)
                .unwrap();
        assert_eq!(record.transfer_flag, "");
        assert_eq!(record.voting_status, VotingStatus::Unset);
    }

    #[test]
    fn null_and_numeric_columns_degrade_instead_of_failing_the_page() {
        let page: VoterPage = serde_json::from_str(
            r#"{
                "data": [
                    {"id": 1, "name": "Asha Patil", "booth_id": "12", "voting_status": "Completed"},
                    {"id": 2, "address": null, "name": null, "mobile": null, "voter_card_no": null},
                    {"id": "3", "booth_id": 12, "voting_status": 5, "surveyed_at": null},
                    {"id": 4.0, "mobile": 9876543210, "surveyed_at": 20240513},
                    "not a row"
                ],
                "pagination": {"currentPage": 1, "totalPages": 1, "totalRecords": 5, "limit": 50,
                               "hasNextPage": false, "hasPrevPage": false}
            }"#,
        )
        .unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.data[0].name, "Asha Patil");
        assert!(page.data[0].has_voted());

        assert_eq!(page.data[1].id, 2);
        assert_eq!(page.data[1].address, "");
        assert_eq!(page.data[1].name, "");

        assert_eq!(page.data[2].id, 3);
        assert_eq!(page.data[2].booth_id, "12");
        assert_eq!(page.data[2].voting_status, VotingStatus::Other("5".to_string()));
        assert!(!page.data[2].is_surveyed());

        assert_eq!(page.data[3].id, 4);
        assert_eq!(page.data[3].mobile, "9876543210");
        assert!(page.data[3].is_surveyed());

        assert_eq!(page.data[4], VoterRecord::default());
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let record: VoterRecord =
            serde_json::from_str(r#"{"voting_status": "Postal"}"#).unwrap();
        assert_eq!(record.voting_status, VotingStatus::Other("Postal".to_string()));
        assert!(!record.has_voted());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["voting_status"], "Postal");
    }

    #[test]
    fn empty_survey_marker_is_not_surveyed() {
        let mut record = VoterRecord {
            surveyed_at: Some(String::new()),
            ..Default::default()
        };
        assert!(!record.is_surveyed());
        record.surveyed_at = Some("2024-04-19 10:12:00".to_string());
        assert!(record.is_surveyed());
    }
}
