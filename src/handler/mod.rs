pub mod assistant;
pub mod invoices;
pub mod jobs;
pub mod payments;
pub mod photos;
