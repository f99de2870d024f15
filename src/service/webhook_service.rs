use std::collections::HashMap;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::service::{
    error::ServiceError, invoice_service::InvoiceService, payment_service::IntentMetadata,
};

const EVENT_PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
const EVENT_PAYMENT_FAILED: &str = "payment_intent.payment_failed";

/// Event envelope delivered by the payment processor.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: IntentObject,
}

#[derive(Debug, Deserialize)]
pub struct IntentObject {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Outcome of a dispatched event, used by the handler to decide whether
/// the delivery is acknowledged.
#[derive(Debug, PartialEq)]
pub enum WebhookOutcome {
    Processed,
    Ignored,
}

/// Reconciles asynchronous processor events against invoice and job
/// state. Safe under redelivery: both settlement paths are idempotent.
#[derive(Clone)]
pub struct WebhookService {
    invoice_service: Arc<InvoiceService>,
    webhook_secret: String,
}

impl std::fmt::Debug for WebhookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookService")
            .field("invoice_service", &self.invoice_service)
            .field("webhook_secret", &"[redacted]")
            .finish()
    }
}

impl WebhookService {
    pub fn new(invoice_service: Arc<InvoiceService>, webhook_secret: String) -> Self {
        WebhookService {
            invoice_service,
            webhook_secret,
        }
    }

    /// Verify the processor's signature header over the raw payload.
    /// Fails closed: any parse or comparison failure is `InvalidSignature`.
    pub fn verify_signature(&self, signature_header: &str, payload: &[u8]) -> Result<(), ServiceError> {
        verify_signature(&self.webhook_secret, signature_header, payload)
    }

    pub async fn handle_event(&self, event: WebhookEvent) -> Result<WebhookOutcome, ServiceError> {
        match event.event_type.as_str() {
            EVENT_PAYMENT_SUCCEEDED => {
                let metadata = IntentMetadata::from_map(&event.data.object.metadata)?;
                self.invoice_service.mark_paid(metadata.invoice_id).await?;
                tracing::info!(
                    invoice_id = %metadata.invoice_id,
                    payment_intent_id = %event.data.object.id,
                    "payment succeeded"
                );
                Ok(WebhookOutcome::Processed)
            }
            EVENT_PAYMENT_FAILED => {
                let metadata = IntentMetadata::from_map(&event.data.object.metadata)?;
                self.invoice_service
                    .mark_failed(metadata.invoice_id)
                    .await?;
                tracing::info!(
                    invoice_id = %metadata.invoice_id,
                    payment_intent_id = %event.data.object.id,
                    "payment failed"
                );
                Ok(WebhookOutcome::Processed)
            }
            // unknown event types are not failures: stay forward
            // compatible with processor additions
            other => {
                tracing::info!("Unhandled webhook event: {}", other);
                Ok(WebhookOutcome::Ignored)
            }
        }
    }
}

/// The processor signs `"{timestamp}.{raw_body}"` with HMAC-SHA256 and
/// sends `t=<timestamp>,v1=<hex>` (possibly several `v1` entries during
/// secret rotation). Comparison is constant time.
pub fn verify_signature(
    secret: &str,
    signature_header: &str,
    payload: &[u8],
) -> Result<(), ServiceError> {
    let mut timestamp: Option<&str> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(ServiceError::InvalidSignature)?;
    if candidates.is_empty() {
        return Err(ServiceError::InvalidSignature);
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| ServiceError::InvalidSignature)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());

    let matched = candidates.iter().any(|candidate| {
        bool::from(ConstantTimeEq::ct_eq(
            candidate.as_bytes(),
            expected.as_bytes(),
        ))
    });

    if matched {
        Ok(())
    } else {
        Err(ServiceError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = format!("t=1692000000,v1={}", sign(SECRET, "1692000000", payload));
        assert!(verify_signature(SECRET, &header, payload).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = format!("t=1692000000,v1={}", sign(SECRET, "1692000000", payload));
        let tampered = br#"{"type":"payment_intent.payment_failed"}"#;
        assert!(matches!(
            verify_signature(SECRET, &header, tampered),
            Err(ServiceError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = b"{}";
        let header = format!(
            "t=1692000000,v1={}",
            sign("whsec_other", "1692000000", payload)
        );
        assert!(verify_signature(SECRET, &header, payload).is_err());
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(verify_signature(SECRET, "", b"{}").is_err());
        assert!(verify_signature(SECRET, "t=123", b"{}").is_err());
        assert!(verify_signature(SECRET, "v1=deadbeef", b"{}").is_err());
        assert!(verify_signature(SECRET, "garbage", b"{}").is_err());
    }

    #[test]
    fn test_any_matching_v1_entry_accepted() {
        let payload = b"{}";
        let good = sign(SECRET, "1692000000", payload);
        let header = format!("t=1692000000,v1=deadbeef,v1={}", good);
        assert!(verify_signature(SECRET, &header, payload).is_ok());
    }

    #[test]
    fn test_event_envelope_parses() {
        let body = r#"{
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "data": {
                "object": {
                    "id": "pi_123",
                    "amount": 10250,
                    "metadata": {"invoice_id": "00000000-0000-0000-0000-000000000001"}
                }
            }
        }"#;
        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.data.object.id, "pi_123");
        assert_eq!(event.data.object.amount, 10250);
        assert_eq!(
            event.data.object.metadata.get("invoice_id").unwrap(),
            "00000000-0000-0000-0000-000000000001"
        );
    }
}
