use async_trait::async_trait;
use sqlx::types::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::invoicemodel::{Invoice, InvoiceStatus};
use crate::utils::fees::FeeBreakdown;

const INVOICE_COLUMNS: &str = r#"
    id, job_id, client_id, provider_id, amount,
    platform_fee, provider_fee, client_fee, status,
    payment_intent_id, paid_at, created_at, updated_at
"#;

#[async_trait]
pub trait InvoiceExt {
    async fn create_invoice(
        &self,
        job_id: Uuid,
        client_id: Uuid,
        provider_id: Uuid,
        amount: BigDecimal,
        fees: &FeeBreakdown,
    ) -> Result<Invoice, Error>;

    async fn get_invoice_by_id(&self, invoice_id: Uuid) -> Result<Option<Invoice>, Error>;

    async fn list_invoices_for_client(
        &self,
        client_id: Uuid,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, Error>;

    async fn list_invoices_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, Error>;

    async fn list_all_invoices(
        &self,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, Error>;

    /// Record the processor intent id on a still-payable invoice
    /// (`PENDING` or `FAILED`). Returns `None` when the invoice settled
    /// in the meantime.
    async fn set_payment_intent(
        &self,
        invoice_id: Uuid,
        payment_intent_id: &str,
    ) -> Result<Option<Invoice>, Error>;

    /// Conditionally settle the invoice. Returns `None` when the invoice
    /// was already `PAID` (redelivered confirmations cannot overwrite the
    /// original `paid_at`) or `REFUNDED`.
    async fn mark_invoice_paid(&self, invoice_id: Uuid) -> Result<Option<Invoice>, Error>;

    /// Conditionally fail the invoice. `PAID` and `REFUNDED` rows are left
    /// untouched (returns `None`): the status lattice is monotonic.
    async fn mark_invoice_failed(&self, invoice_id: Uuid) -> Result<Option<Invoice>, Error>;
}

#[async_trait]
impl InvoiceExt for DBClient {
    async fn create_invoice(
        &self,
        job_id: Uuid,
        client_id: Uuid,
        provider_id: Uuid,
        amount: BigDecimal,
        fees: &FeeBreakdown,
    ) -> Result<Invoice, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices
                (job_id, client_id, provider_id, amount,
                 platform_fee, provider_fee, client_fee, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending'::invoice_status)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(client_id)
        .bind(provider_id)
        .bind(amount)
        .bind(&fees.platform_fee)
        .bind(&fees.provider_fee)
        .bind(&fees.client_fee)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_invoice_by_id(&self, invoice_id: Uuid) -> Result<Option<Invoice>, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1
            "#
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_invoices_for_client(
        &self,
        client_id: Uuid,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS} FROM invoices
            WHERE client_id = $1
              AND ($2::invoice_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(client_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_invoices_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS} FROM invoices
            WHERE provider_id = $1
              AND ($2::invoice_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(provider_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_all_invoices(
        &self,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS} FROM invoices
            WHERE ($1::invoice_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
    }

    async fn set_payment_intent(
        &self,
        invoice_id: Uuid,
        payment_intent_id: &str,
    ) -> Result<Option<Invoice>, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET payment_intent_id = $2, updated_at = NOW()
            WHERE id = $1
              AND status IN ('pending'::invoice_status, 'failed'::invoice_status)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(payment_intent_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_invoice_paid(&self, invoice_id: Uuid) -> Result<Option<Invoice>, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'paid'::invoice_status,
                paid_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('paid'::invoice_status, 'refunded'::invoice_status)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_invoice_failed(&self, invoice_id: Uuid) -> Result<Option<Invoice>, Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'failed'::invoice_status, updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('paid'::invoice_status, 'refunded'::invoice_status)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
    }
}
