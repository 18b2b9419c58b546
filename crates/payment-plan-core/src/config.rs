use serde::{Deserialize, Serialize};

use crate::error::PaymentPlanError;
use crate::plan::{Discount, Installment, RateConfig};
use crate::validation::validate;
use crate::PaymentPlanResult;

/// A complete, shareable plan setup: rates, installments and discounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanConfiguration {
    #[serde(default)]
    pub rates: RateConfig,
    #[serde(default)]
    pub installments: Vec<Installment>,
    #[serde(default)]
    pub discounts: Vec<Discount>,
}

/// Serialize a configuration as pretty-printed JSON.
pub fn export_configuration(config: &PlanConfiguration) -> PaymentPlanResult<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Parse a configuration and reject it if the validator reports errors.
pub fn import_configuration(json: &str) -> PaymentPlanResult<PlanConfiguration> {
    let config: PlanConfiguration = serde_json::from_str(json)?;
    let report = validate(&config.installments, &config.rates, &config.discounts);
    if !report.valid {
        return Err(PaymentPlanError::ValidationFailed {
            errors: report.errors,
        });
    }
    Ok(config)
}
