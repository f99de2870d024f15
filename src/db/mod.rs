pub mod db;
pub mod invoicedb;
pub mod jobdb;
pub mod photodb;
pub mod userdb;
