//! Currency helpers for talking to the payment processor.
//!
//! Amounts are stored as 2-decimal-place decimals and submitted to the
//! processor in minor units (1 dollar = 100 cents).

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::ToPrimitive;

/// Convert a decimal amount to minor currency units (cents).
pub fn to_minor_units(amount: &BigDecimal) -> Result<i64, String> {
    if *amount < BigDecimal::from(0) {
        return Err("Amount cannot be negative".to_string());
    }
    (amount * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
        .ok_or_else(|| "Amount out of range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_minor_units() {
        let amount = BigDecimal::from_str("102.50").unwrap();
        assert_eq!(to_minor_units(&amount), Ok(10250));
        let amount = BigDecimal::from_str("0.50").unwrap();
        assert_eq!(to_minor_units(&amount), Ok(50));
        let amount = BigDecimal::from_str("123.45").unwrap();
        assert_eq!(to_minor_units(&amount), Ok(12345));
    }

    #[test]
    fn test_to_minor_units_rejects_negative() {
        let amount = BigDecimal::from_str("-1.00").unwrap();
        assert!(to_minor_units(&amount).is_err());
    }
}
