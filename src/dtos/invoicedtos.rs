use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::invoicemodel::InvoiceStatus;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateInvoiceDto {
    pub job_id: Uuid,

    /// Defaults to the job's budget when omitted.
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceFilterQuery {
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InitiatePaymentDto {
    pub invoice_id: Uuid,
}
