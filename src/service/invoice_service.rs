use std::sync::Arc;

use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, invoicedb::InvoiceExt, jobdb::JobExt},
    models::{
        invoicemodel::{Invoice, InvoiceStatus},
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
    utils::fees::calculate_fees,
};

/// Owns invoice creation and the invoice status lattice. `PAID` is
/// absorbing: once set it is never downgraded, and settling an invoice
/// drives the job's `COMPLETED -> PAID` transition exactly once.
#[derive(Debug, Clone)]
pub struct InvoiceService {
    db_client: Arc<DBClient>,
}

impl InvoiceService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        InvoiceService { db_client }
    }

    /// Create a `PENDING` invoice for a job. The requester must be one of
    /// the job's parties, the job must have an assigned provider, and the
    /// fees are computed once here and never re-derived.
    pub async fn create_invoice(
        &self,
        job_id: Uuid,
        amount: Option<BigDecimal>,
        requester: &User,
    ) -> Result<Invoice, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if !job.is_party(requester.id) {
            return Err(ServiceError::Forbidden {
                user: requester.id,
                entity: job_id,
            });
        }

        let provider_id = job.provider_id.ok_or_else(|| {
            ServiceError::InvalidState("Job has no assigned provider to invoice".to_string())
        })?;

        let amount = amount.unwrap_or_else(|| job.budget.clone());
        let fees = calculate_fees(&amount).map_err(ServiceError::Validation)?;

        let invoice = self
            .db_client
            .create_invoice(job_id, job.client_id, provider_id, amount, &fees)
            .await?;

        tracing::info!(
            invoice_id = %invoice.id,
            job_id = %job_id,
            amount = %invoice.amount,
            "invoice created"
        );
        Ok(invoice)
    }

    pub async fn get_invoice(
        &self,
        invoice_id: Uuid,
        requester: &User,
    ) -> Result<Invoice, ServiceError> {
        let invoice = self
            .db_client
            .get_invoice_by_id(invoice_id)
            .await?
            .ok_or(ServiceError::InvoiceNotFound(invoice_id))?;

        if requester.role != UserRole::Admin && !invoice.is_party(requester.id) {
            return Err(ServiceError::Forbidden {
                user: requester.id,
                entity: invoice_id,
            });
        }
        Ok(invoice)
    }

    pub async fn list_invoices(
        &self,
        requester: &User,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>, ServiceError> {
        let invoices = match requester.role {
            UserRole::Client => {
                self.db_client
                    .list_invoices_for_client(requester.id, status)
                    .await?
            }
            UserRole::Provider => {
                self.db_client
                    .list_invoices_for_provider(requester.id, status)
                    .await?
            }
            UserRole::Admin => self.db_client.list_all_invoices(status).await?,
        };
        Ok(invoices)
    }

    /// Settle an invoice after a confirmed payment. Idempotent: a second
    /// call observes `PAID` and returns without touching `paid_at` or the
    /// job. Called only by the webhook reconciler.
    pub async fn mark_paid(&self, invoice_id: Uuid) -> Result<Invoice, ServiceError> {
        let invoice = self
            .db_client
            .get_invoice_by_id(invoice_id)
            .await?
            .ok_or(ServiceError::InvoiceNotFound(invoice_id))?;

        let target = invoice.status.on_payment_succeeded();
        if target == invoice.status {
            tracing::info!(
                invoice_id = %invoice_id,
                status = invoice.status.to_str(),
                "invoice already settled, skipping"
            );
            return Ok(invoice);
        }

        let updated = match self.db_client.mark_invoice_paid(invoice_id).await? {
            Some(invoice) => invoice,
            // conditional write matched nothing: a concurrent delivery won
            None => self
                .db_client
                .get_invoice_by_id(invoice_id)
                .await?
                .ok_or(ServiceError::InvoiceNotFound(invoice_id))?,
        };

        // Drive the job to paid; the conditional update fires only from
        // `completed`, so a redelivered event cannot transition it twice.
        let job_id = updated.job_id;
        match self.db_client.mark_job_paid(job_id).await? {
            Some(_) => {
                tracing::info!(
                    invoice_id = %invoice_id,
                    job_id = %job_id,
                    provider_net = %updated.provider_net(),
                    "invoice paid, job settled"
                );
            }
            None => {
                let job = self
                    .db_client
                    .get_job_by_id(job_id)
                    .await?
                    .ok_or(ServiceError::JobNotFound(job_id))?;
                if job.status != crate::models::jobmodel::JobStatus::Paid {
                    tracing::warn!(
                        invoice_id = %invoice_id,
                        job_id = %job_id,
                        job_status = job.status.to_str(),
                        "invoice paid but job was not completed"
                    );
                }
            }
        }

        Ok(updated)
    }

    /// Record a failed payment. `PAID` dominates: a late failure event
    /// never downgrades a settled invoice.
    pub async fn mark_failed(&self, invoice_id: Uuid) -> Result<Invoice, ServiceError> {
        let invoice = self
            .db_client
            .get_invoice_by_id(invoice_id)
            .await?
            .ok_or(ServiceError::InvoiceNotFound(invoice_id))?;

        let target = invoice.status.on_payment_failed();
        if target == invoice.status {
            return Ok(invoice);
        }

        let updated = match self.db_client.mark_invoice_failed(invoice_id).await? {
            Some(invoice) => invoice,
            // the success webhook won the race; keep PAID
            None => self
                .db_client
                .get_invoice_by_id(invoice_id)
                .await?
                .ok_or(ServiceError::InvoiceNotFound(invoice_id))?,
        };

        tracing::info!(
            invoice_id = %invoice_id,
            status = updated.status.to_str(),
            "payment failure recorded"
        );
        Ok(updated)
    }
}
