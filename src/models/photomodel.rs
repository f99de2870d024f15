use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "photo_type", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhotoType {
    Before,
    After,
    Progress,
}

impl PhotoType {
    pub fn to_str(&self) -> &str {
        match self {
            PhotoType::Before => "before",
            PhotoType::After => "after",
            PhotoType::Progress => "progress",
        }
    }

    /// Proof-of-work photos only make sense once work has started.
    pub fn requires_work_started(&self) -> bool {
        matches!(self, PhotoType::Progress | PhotoType::After)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub job_id: Uuid,
    pub uploader_id: Uuid,
    pub photo_type: PhotoType,
    pub url: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub captured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
