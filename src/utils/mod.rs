pub mod currency;
pub mod fees;
pub mod token;
