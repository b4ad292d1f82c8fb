use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document in `communities/{id}/announcements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub posted_at: DateTime<Utc>,
}
