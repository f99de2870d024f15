use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl InvoiceStatus {
    pub fn to_str(&self) -> &str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Failed => "failed",
            InvoiceStatus::Refunded => "refunded",
        }
    }

    /// Whether a payment can still be initiated for this invoice. A
    /// failed attempt may be retried; settled and refunded invoices
    /// cannot be charged again.
    pub fn is_payable(&self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Failed)
    }

    /// Status the invoice ends up in when a payment-succeeded event
    /// arrives. Redelivery of the event is a no-op.
    pub fn on_payment_succeeded(self) -> InvoiceStatus {
        match self {
            InvoiceStatus::Refunded => InvoiceStatus::Refunded,
            _ => InvoiceStatus::Paid,
        }
    }

    /// Status the invoice ends up in when a payment-failed event arrives.
    /// `Paid` dominates: a late failure never downgrades a success.
    pub fn on_payment_failed(self) -> InvoiceStatus {
        match self {
            InvoiceStatus::Paid => InvoiceStatus::Paid,
            InvoiceStatus::Refunded => InvoiceStatus::Refunded,
            _ => InvoiceStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub amount: BigDecimal,
    pub platform_fee: BigDecimal,
    pub provider_fee: BigDecimal,
    pub client_fee: BigDecimal,
    pub status: InvoiceStatus,
    pub payment_intent_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Total ever charged to the client: amount plus the client-side fee.
    pub fn total_payable(&self) -> BigDecimal {
        &self.amount + &self.client_fee
    }

    /// Net amount owed to the provider after the platform takes its cut.
    pub fn provider_net(&self) -> BigDecimal {
        &self.amount - &self.platform_fee - &self.provider_fee
    }

    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.provider_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn invoice_with(amount: &str, fee: &str) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            amount: BigDecimal::from_str(amount).unwrap(),
            platform_fee: BigDecimal::from_str(fee).unwrap(),
            provider_fee: BigDecimal::from_str(fee).unwrap(),
            client_fee: BigDecimal::from_str(fee).unwrap(),
            status: InvoiceStatus::Pending,
            payment_intent_id: None,
            paid_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_payable() {
        let invoice = invoice_with("100.00", "2.50");
        assert_eq!(
            invoice.total_payable(),
            BigDecimal::from_str("102.50").unwrap()
        );
    }

    #[test]
    fn test_provider_net_balances() {
        let invoice = invoice_with("100.00", "2.50");
        let net = invoice.provider_net();
        assert_eq!(net, BigDecimal::from_str("95.00").unwrap());
        // amount = provider_net + platform_fee + provider_fee
        assert_eq!(
            net + &invoice.platform_fee + &invoice.provider_fee,
            invoice.amount
        );
    }

    #[test]
    fn test_failed_invoice_remains_payable() {
        assert!(InvoiceStatus::Pending.is_payable());
        assert!(InvoiceStatus::Failed.is_payable());
        assert!(!InvoiceStatus::Paid.is_payable());
        assert!(!InvoiceStatus::Refunded.is_payable());
    }

    #[test]
    fn test_paid_dominates_failed() {
        assert_eq!(
            InvoiceStatus::Paid.on_payment_failed(),
            InvoiceStatus::Paid
        );
        assert_eq!(
            InvoiceStatus::Pending.on_payment_failed(),
            InvoiceStatus::Failed
        );
        assert_eq!(
            InvoiceStatus::Failed.on_payment_failed(),
            InvoiceStatus::Failed
        );
    }

    #[test]
    fn test_payment_succeeded_is_idempotent() {
        assert_eq!(
            InvoiceStatus::Pending.on_payment_succeeded(),
            InvoiceStatus::Paid
        );
        assert_eq!(
            InvoiceStatus::Paid.on_payment_succeeded(),
            InvoiceStatus::Paid
        );
        // a failed invoice may still be retried and succeed
        assert_eq!(
            InvoiceStatus::Failed.on_payment_succeeded(),
            InvoiceStatus::Paid
        );
    }
}
