pub mod invoicemodel;
pub mod jobmodel;
pub mod photomodel;
pub mod usermodel;
