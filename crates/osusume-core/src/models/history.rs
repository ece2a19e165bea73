use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A consumed item the user chose to record, with an optional 1-5 rating.
///
/// History entries live independently of the recommendation flow; they are
/// created and deleted only by explicit user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub genre: Option<String>,
    /// 1-5 scale.
    pub rating: Option<u8>,
    pub date_added: DateTime<Utc>,
}
