use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct GenerateDescriptionDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    pub location: Option<String>,
    pub budget: Option<String>,
    pub estimated_duration: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpsellSuggestionsDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, max = 5000, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedTextDto {
    pub text: String,
}
