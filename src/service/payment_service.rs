use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, invoicedb::InvoiceExt, jobdb::JobExt},
    models::usermodel::User,
    service::{
        error::ServiceError,
        stripe::{PaymentIntent, StripeClient},
    },
    utils::currency::to_minor_units,
};

/// Reconciliation metadata attached to every payment intent. The webhook
/// reconciler acts on these fields alone rather than trusting a second
/// database read keyed only on the processor's say-so.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentMetadata {
    pub invoice_id: Uuid,
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub platform_fee: String,
    pub provider_fee: String,
    pub client_fee: String,
}

impl IntentMetadata {
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("invoice_id".to_string(), self.invoice_id.to_string()),
            ("job_id".to_string(), self.job_id.to_string()),
            ("client_id".to_string(), self.client_id.to_string()),
            ("provider_id".to_string(), self.provider_id.to_string()),
            ("platform_fee".to_string(), self.platform_fee.clone()),
            ("provider_fee".to_string(), self.provider_fee.clone()),
            ("client_fee".to_string(), self.client_fee.clone()),
        ])
    }

    /// Decode and validate processor metadata at the boundary. Malformed
    /// or missing fields are a validation error, not a panic downstream.
    pub fn from_map(metadata: &HashMap<String, String>) -> Result<Self, ServiceError> {
        let field = |key: &str| {
            metadata
                .get(key)
                .cloned()
                .ok_or_else(|| ServiceError::Validation(format!("Missing metadata field: {key}")))
        };
        let uuid_field = |key: &str| {
            field(key).and_then(|value| {
                Uuid::parse_str(&value).map_err(|_| {
                    ServiceError::Validation(format!("Metadata field {key} is not a valid id"))
                })
            })
        };
        let decimal_field = |key: &str| {
            field(key).and_then(|value| {
                BigDecimal::from_str(&value)
                    .map(|_| value)
                    .map_err(|_| {
                        ServiceError::Validation(format!(
                            "Metadata field {key} is not a valid decimal"
                        ))
                    })
            })
        };

        Ok(IntentMetadata {
            invoice_id: uuid_field("invoice_id")?,
            job_id: uuid_field("job_id")?,
            client_id: uuid_field("client_id")?,
            provider_id: uuid_field("provider_id")?,
            platform_fee: decimal_field("platform_fee")?,
            provider_fee: decimal_field("provider_fee")?,
            client_fee: decimal_field("client_fee")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InitiatedPayment {
    pub payment_intent_id: String,
    pub client_secret: String,
}

/// Bridges invoices to the payment processor: creates (or reuses) an
/// intent for the payable total and records the intent id on the invoice.
#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
    stripe: Arc<StripeClient>,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>, stripe: Arc<StripeClient>) -> Self {
        PaymentService { db_client, stripe }
    }

    pub async fn initiate_payment(
        &self,
        invoice_id: Uuid,
        requester: &User,
    ) -> Result<InitiatedPayment, ServiceError> {
        let invoice = self
            .db_client
            .get_invoice_by_id(invoice_id)
            .await?
            .ok_or(ServiceError::InvoiceNotFound(invoice_id))?;

        if !invoice.is_party(requester.id) {
            return Err(ServiceError::Forbidden {
                user: requester.id,
                entity: invoice_id,
            });
        }

        // PENDING and FAILED are both payable: a failed attempt may be
        // retried with a fresh intent.
        if !invoice.status.is_payable() {
            return Err(ServiceError::InvalidState(format!(
                "Invoice is {} and cannot be paid",
                invoice.status.to_str()
            )));
        }

        // Reuse an existing non-terminal intent instead of creating a
        // duplicate charge when the bridge is called twice.
        if let Some(existing_id) = &invoice.payment_intent_id {
            let existing = self.stripe.retrieve_payment_intent(existing_id).await?;
            if existing.is_reusable() {
                return payment_from_intent(existing);
            }
            if existing.status == "succeeded" {
                return Err(ServiceError::InvalidState(
                    "Payment already succeeded, awaiting confirmation".to_string(),
                ));
            }
            // canceled: fall through and create a fresh intent
        }

        let job = self
            .db_client
            .get_job_by_id(invoice.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(invoice.job_id))?;

        let total = invoice.total_payable();
        let amount_minor = to_minor_units(&total).map_err(ServiceError::Validation)?;

        let metadata = IntentMetadata {
            invoice_id: invoice.id,
            job_id: invoice.job_id,
            client_id: invoice.client_id,
            provider_id: invoice.provider_id,
            platform_fee: invoice.platform_fee.to_string(),
            provider_fee: invoice.provider_fee.to_string(),
            client_fee: invoice.client_fee.to_string(),
        };

        let intent = self
            .stripe
            .create_payment_intent(
                amount_minor,
                "usd",
                &format!("Payment for {}", job.title),
                &metadata.to_map(),
            )
            .await?;

        // Persist the intent id only while the invoice is still payable;
        // losing this race means a webhook settled it underneath us.
        self.db_client
            .set_payment_intent(invoice_id, &intent.id)
            .await?
            .ok_or(ServiceError::Conflict)?;

        tracing::info!(
            invoice_id = %invoice_id,
            payment_intent_id = %intent.id,
            amount_minor,
            "payment intent created"
        );

        payment_from_intent(intent)
    }
}

fn payment_from_intent(intent: PaymentIntent) -> Result<InitiatedPayment, ServiceError> {
    let client_secret = intent.client_secret.ok_or_else(|| {
        ServiceError::ProcessorUnavailable("Intent response missing client secret".to_string())
    })?;
    Ok(InitiatedPayment {
        payment_intent_id: intent.id,
        client_secret,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> IntentMetadata {
        IntentMetadata {
            invoice_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            platform_fee: "2.50".to_string(),
            provider_fee: "2.50".to_string(),
            client_fee: "2.50".to_string(),
        }
    }

    #[test]
    fn test_metadata_round_trip() {
        let metadata = sample_metadata();
        let decoded = IntentMetadata::from_map(&metadata.to_map()).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn test_metadata_missing_field_rejected() {
        let mut map = sample_metadata().to_map();
        map.remove("invoice_id");
        assert!(matches!(
            IntentMetadata::from_map(&map),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_metadata_malformed_uuid_rejected() {
        let mut map = sample_metadata().to_map();
        map.insert("job_id".to_string(), "not-a-uuid".to_string());
        assert!(matches!(
            IntentMetadata::from_map(&map),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_metadata_malformed_decimal_rejected() {
        let mut map = sample_metadata().to_map();
        map.insert("client_fee".to_string(), "two fifty".to_string());
        assert!(matches!(
            IntentMetadata::from_map(&map),
            Err(ServiceError::Validation(_))
        ));
    }
}
