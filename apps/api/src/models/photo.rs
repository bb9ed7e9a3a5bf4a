use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw `media` row as stored. Nullable text columns are normalized by
/// `From<PhotoRow> for PhotoMetadata`.
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub id: i64,
    pub filename: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub people: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Read-only catalog entry. `filename` is the unique key; empty strings stand
/// in for absent text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub people: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PhotoMetadata {
    /// Lower-cased `title description people`, the haystack for name and keyword matching.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.people).to_lowercase()
    }

    pub fn has_people(&self) -> bool {
        !self.people.trim().is_empty()
    }
}

impl From<PhotoRow> for PhotoMetadata {
    fn from(row: PhotoRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            year: row.year,
            people: row.people.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}
