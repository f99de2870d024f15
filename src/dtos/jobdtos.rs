use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::jobmodel::JobStatus;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(
        min = 10,
        max = 5000,
        message = "Description must be between 10 and 5000 characters"
    ))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,

    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobFilterQuery {
    pub status: Option<JobStatus>,
    pub category: Option<String>,
}
