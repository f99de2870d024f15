pub mod assistant_service;
pub mod error;
pub mod invoice_service;
pub mod job_service;
pub mod payment_service;
pub mod stripe;
pub mod webhook_service;
