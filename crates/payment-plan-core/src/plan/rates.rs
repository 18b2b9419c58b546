use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::parse;
use crate::types::{Money, Percent};

/// Rates applied to one calculation. All percentages are on the 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// GST charged on installments flagged `apply_gst`
    #[serde(deserialize_with = "parse::decimal")]
    pub gst_percent: Percent,
    /// Registry (stamp duty) charge on the cost value
    #[serde(deserialize_with = "parse::decimal")]
    pub registry_percent: Percent,
    /// Default annual simple-interest rate credited on early payments
    #[serde(deserialize_with = "parse::decimal")]
    pub annual_interest_percent: Percent,
    /// Buyer's opportunity cost, used to discount cash flows; 0 disables NPV
    #[serde(deserialize_with = "parse::decimal")]
    pub cost_of_money_percent: Percent,
    /// Flat possession charge per unit of area
    #[serde(deserialize_with = "parse::decimal")]
    pub possession_charge_per_unit_area: Money,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            gst_percent: dec!(5),
            registry_percent: dec!(7),
            annual_interest_percent: dec!(10),
            cost_of_money_percent: dec!(8),
            possession_charge_per_unit_area: dec!(250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let rates: RateConfig = serde_json::from_str(r#"{"gst_percent": "12"}"#).unwrap();
        assert_eq!(rates.gst_percent, dec!(12));
        assert_eq!(rates.registry_percent, dec!(7));
        assert_eq!(rates.possession_charge_per_unit_area, dec!(250));
    }

    #[test]
    fn test_malformed_rate_is_zero() {
        let rates: RateConfig =
            serde_json::from_str(r#"{"annual_interest_percent": "ten"}"#).unwrap();
        assert!(rates.annual_interest_percent.is_zero());
    }
}
