use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{config::Config, service::error::ServiceError};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Thin client for the payment processor's REST API. Constructed once at
/// startup and injected into the services that need it.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("base_url", &self.base_url)
            .field("secret_key", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PaymentIntent {
    /// Whether this intent can still be completed by the client.
    pub fn is_reusable(&self) -> bool {
        self.status != "canceled" && self.status != "succeeded"
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to build http client");

        StripeClient {
            http,
            secret_key: config.stripe_secret_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        description: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<PaymentIntent, ServiceError> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), amount_minor.to_string()),
            ("currency".to_string(), currency.to_string()),
            ("description".to_string(), description.to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        for (key, value) in metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        let response = self
            .http
            .post(format!("{}/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| ServiceError::ProcessorUnavailable(e.to_string()))?;

        Self::parse_intent_response(response).await
    }

    pub async fn retrieve_payment_intent(
        &self,
        intent_id: &str,
    ) -> Result<PaymentIntent, ServiceError> {
        let response = self
            .http
            .get(format!("{}/payment_intents/{}", self.base_url, intent_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| ServiceError::ProcessorUnavailable(e.to_string()))?;

        Self::parse_intent_response(response).await
    }

    async fn parse_intent_response(
        response: reqwest::Response,
    ) -> Result<PaymentIntent, ServiceError> {
        if response.status().is_success() {
            response
                .json::<PaymentIntent>()
                .await
                .map_err(|e| ServiceError::ProcessorUnavailable(e.to_string()))
        } else {
            let status = response.status();
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| format!("processor returned {}", status));
            Err(ServiceError::ProcessorUnavailable(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_reusability() {
        let intent = |status: &str| PaymentIntent {
            id: "pi_123".to_string(),
            status: status.to_string(),
            client_secret: Some("pi_123_secret".to_string()),
            amount: 10250,
            metadata: HashMap::new(),
        };

        assert!(intent("requires_payment_method").is_reusable());
        assert!(intent("requires_confirmation").is_reusable());
        assert!(intent("processing").is_reusable());
        assert!(!intent("succeeded").is_reusable());
        assert!(!intent("canceled").is_reusable());
    }

    #[test]
    fn test_debug_output_redacts_secret_key() {
        let config = Config {
            database_url: "postgres://localhost/app".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
            jwt_secret: "jwt".to_string(),
            port: 8000,
            stripe_secret_key: "sk_test_abc123".to_string(),
            stripe_webhook_secret: "whsec_abc123".to_string(),
            openai_api_key: "".to_string(),
        };
        let client = StripeClient::new(&config);
        let printed = format!("{:?}", client);
        assert!(!printed.contains("sk_test_abc123"));
        assert!(printed.contains("api.stripe.com"));
    }

    #[test]
    fn test_intent_deserializes_without_metadata() {
        let intent: PaymentIntent = serde_json::from_str(
            r#"{"id":"pi_1","status":"processing","client_secret":null,"amount":500}"#,
        )
        .unwrap();
        assert!(intent.metadata.is_empty());
        assert!(intent.client_secret.is_none());
    }
}
