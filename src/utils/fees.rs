use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Platform, provider and client each pay 2.5% of the invoiced amount.
pub const FEE_RATE: &str = "0.025";

/// Fee scale in minor currency units (2 decimal places).
const MONEY_SCALE: i64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeBreakdown {
    pub platform_fee: BigDecimal,
    pub provider_fee: BigDecimal,
    pub client_fee: BigDecimal,
    pub total_fees: BigDecimal,
    pub net_amount: BigDecimal,
}

/// Split a non-negative amount into the three 2.5% fees.
///
/// Each fee is rounded half-up to 2 decimal places at computation time;
/// totals and the net amount are derived from the rounded fees by exact
/// addition/subtraction, so `amount = net + total_fees` and
/// `amount = provider_net + platform_fee + provider_fee` hold at scale 2
/// with no silent rounding residue.
pub fn calculate_fees(amount: &BigDecimal) -> Result<FeeBreakdown, String> {
    if *amount < BigDecimal::from(0) {
        return Err("Amount cannot be negative".to_string());
    }

    let rate = BigDecimal::from_str(FEE_RATE).expect("fee rate is a valid decimal");

    let fee = (amount * &rate).with_scale_round(MONEY_SCALE, RoundingMode::HalfUp);
    let platform_fee = fee.clone();
    let provider_fee = fee.clone();
    let client_fee = fee;

    let total_fees = &platform_fee + &provider_fee + &client_fee;
    let net_amount = amount - &total_fees;

    Ok(FeeBreakdown {
        platform_fee,
        provider_fee,
        client_fee,
        total_fees,
        net_amount,
    })
}

/// Normalize a raw numeric input to a 2-decimal-place money value.
pub fn to_money(value: f64) -> Result<BigDecimal, String> {
    if value < 0.0 {
        return Err("Amount cannot be negative".to_string());
    }
    BigDecimal::try_from(value)
        .map(|bd| bd.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp))
        .map_err(|_| "Invalid amount".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_amount_splits_evenly() {
        let fees = calculate_fees(&dec("100.00")).unwrap();
        assert_eq!(fees.platform_fee, dec("2.50"));
        assert_eq!(fees.provider_fee, dec("2.50"));
        assert_eq!(fees.client_fee, dec("2.50"));
        assert_eq!(fees.total_fees, dec("7.50"));
        assert_eq!(fees.net_amount, dec("92.50"));
    }

    #[test]
    fn test_zero_amount_yields_zero_fees() {
        let fees = calculate_fees(&dec("0")).unwrap();
        assert_eq!(fees.platform_fee, dec("0.00"));
        assert_eq!(fees.total_fees, dec("0.00"));
        assert_eq!(fees.net_amount, dec("0"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(calculate_fees(&dec("-1.00")).is_err());
        assert!(to_money(-0.01).is_err());
    }

    #[test]
    fn test_fee_additivity() {
        for amount in ["100.00", "33.33", "0.01", "249.99", "1000000.00", "7.77"] {
            let amount = dec(amount);
            let fees = calculate_fees(&amount).unwrap();
            assert_eq!(
                &fees.platform_fee + &fees.provider_fee + &fees.client_fee,
                fees.total_fees
            );
            assert_eq!(&amount - &fees.total_fees, fees.net_amount);
            // no rounding residue is dropped
            assert_eq!(&fees.net_amount + &fees.total_fees, amount);
        }
    }

    #[test]
    fn test_fee_rounding_half_up() {
        // 33.33 * 0.025 = 0.83325 -> 0.83
        let fees = calculate_fees(&dec("33.33")).unwrap();
        assert_eq!(fees.platform_fee, dec("0.83"));
        // 0.20 * 0.025 = 0.005 -> 0.01
        let fees = calculate_fees(&dec("0.20")).unwrap();
        assert_eq!(fees.platform_fee, dec("0.01"));
    }

    #[test]
    fn test_determinism() {
        let a = calculate_fees(&dec("58.21")).unwrap();
        let b = calculate_fees(&dec("58.21")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_money_normalizes_float_noise() {
        assert_eq!(to_money(100.0).unwrap(), dec("100.00"));
        assert_eq!(to_money(0.1).unwrap(), dec("0.10"));
    }
}
