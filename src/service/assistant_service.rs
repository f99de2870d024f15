use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{config::Config, service::error::ServiceError};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-3.5-turbo";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Stateless bridge to the text-generation API. Prompt in, text out; no
/// persistent state of its own.
#[derive(Clone)]
pub struct AssistantService {
    http: reqwest::Client,
    api_key: String,
}

impl std::fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantService")
            .field("api_key", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

pub struct DescriptionRequest {
    pub title: String,
    pub category: String,
    pub location: Option<String>,
    pub budget: Option<String>,
    pub estimated_duration: Option<String>,
}

impl AssistantService {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to build http client");

        AssistantService {
            http,
            api_key: config.openai_api_key.clone(),
        }
    }

    pub async fn generate_job_description(
        &self,
        request: DescriptionRequest,
    ) -> Result<String, ServiceError> {
        let prompt = format!(
            "Generate a professional job description for a service business job posting.\n\n\
             Job Details:\n\
             - Title: {}\n\
             - Category: {}\n\
             - Location: {}\n\
             - Budget: {}\n\
             - Duration: {}\n\n\
             Write a clear, professional description (2-3 paragraphs) explaining what needs \
             to be done, with specific details about the work required. Generate only the \
             job description text, no additional formatting.",
            request.title,
            request.category,
            request.location.as_deref().unwrap_or("Not specified"),
            request.budget.as_deref().unwrap_or("Not specified"),
            request
                .estimated_duration
                .as_deref()
                .unwrap_or("Not specified"),
        );

        self.complete(
            "You write concise, professional service job postings.",
            &prompt,
        )
        .await
    }

    pub async fn upsell_suggestions(
        &self,
        title: &str,
        category: &str,
        description: &str,
    ) -> Result<String, ServiceError> {
        let prompt = format!(
            "A service provider completed the following job:\n\
             Title: {title}\nCategory: {category}\nDescription: {description}\n\n\
             Suggest 3 short, relevant follow-up services the provider could offer the \
             client, one per line.",
        );

        self.complete(
            "You suggest practical follow-up services for trade professionals.",
            &prompt,
        )
        .await
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::Upstream(
                "Text generation is not configured".to_string(),
            ));
        }

        let payload = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": 500,
            "temperature": 0.7,
        });

        let response = self
            .http
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "text generation returned {}",
                response.status()
            )));
        }

        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ServiceError::Upstream("Empty completion response".to_string()))
    }
}
