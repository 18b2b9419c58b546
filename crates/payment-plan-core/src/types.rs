use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed on the percentage scale (5 = 5%), as entered by buyers
/// and quoted by builders.
pub type Percent = Decimal;

/// Whole months elapsed since booking.
pub type Months = u32;

/// Round to the nearest whole currency unit, halves away from zero.
pub fn round_currency(value: Money) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum that gives up at the first overflowing addition.
pub fn checked_sum<I: IntoIterator<Item = Money>>(values: I) -> Option<Money> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_half_away_from_zero() {
        assert_eq!(round_currency(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(2.49)), dec!(2));
        assert_eq!(round_currency(dec!(-2.5)), dec!(-3));
    }

    #[test]
    fn test_checked_sum_stops_on_overflow() {
        assert_eq!(checked_sum(vec![dec!(1), dec!(2.5)]), Some(dec!(3.5)));
        assert_eq!(checked_sum(vec![Decimal::MAX, Decimal::ONE]), None);
        assert_eq!(checked_sum(Vec::new()), Some(Decimal::ZERO));
    }
}
