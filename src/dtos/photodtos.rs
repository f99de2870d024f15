use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::photomodel::PhotoType;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddPhotoDto {
    pub photo_type: PhotoType,

    /// Location of the stored image in the external blob store.
    #[validate(url(message = "Invalid photo URL"))]
    pub url: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: Option<f64>,

    pub captured_at: Option<DateTime<Utc>>,
}
