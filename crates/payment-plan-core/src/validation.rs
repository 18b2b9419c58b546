//! Advisory checks. Nothing here stops the engine from running; callers
//! decide whether a result with errors is shown as trustworthy.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::CalculationRequest;
use crate::plan::{Discount, DiscountKind, Installment, RateConfig, ScheduleOrder};
use crate::types::checked_sum;

const PERCENT_TOLERANCE: Decimal = dec!(0.1);
const MAX_PERCENTAGE_DISCOUNT: Decimal = dec!(50);
const MIN_SENSIBLE_PRICE: Decimal = dec!(100000);
const MAX_SENSIBLE_PRICE: Decimal = dec!(10000000000);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub(crate) fn push_error(&mut self, message: String) {
        self.errors.push(message);
        self.valid = false;
    }

    fn merge(mut self, other: ValidationReport) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.valid = self.errors.is_empty();
        self
    }
}

/// Check a plan, its rates and discounts.
pub fn validate(plan: &[Installment], rates: &RateConfig, discounts: &[Discount]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    validate_installments(plan, &mut errors);
    validate_rates(rates, &mut warnings);
    validate_discount_share(discounts, &mut warnings);

    ValidationReport::from_parts(errors, warnings)
}

/// Everything [`validate`] checks, plus area, price and discount bounds.
pub fn validate_request(request: &CalculationRequest) -> ValidationReport {
    let config = &request.config;
    let base = validate(&config.installments, &config.rates, &config.discounts);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if request.area <= Decimal::ZERO {
        errors.push("Property area must be greater than 0".to_string());
    }

    match request.basic_price() {
        Err(_) => errors.push("Property price is out of range".to_string()),
        Ok(None) => {
            errors.push("Either a price per unit area or a total price is required".to_string())
        }
        Ok(Some(price)) if price <= Decimal::ZERO => {
            errors.push("Property price must be greater than 0".to_string())
        }
        Ok(Some(price)) => {
            if price < MIN_SENSIBLE_PRICE {
                warnings.push(format!("Property price {price} seems too low (below 1,00,000)"));
            }
            if price > MAX_SENSIBLE_PRICE {
                warnings.push(format!(
                    "Property price {price} seems too high (above 10,00,00,00,000)"
                ));
            }
            // An overflowing total is past any price
            let total_discounts = config
                .discounts
                .iter()
                .try_fold(Decimal::ZERO, |acc, d| {
                    acc.checked_add(d.amount_on(price).ok()?)
                });
            if total_discounts.map_or(true, |total| total >= price) {
                warnings.push("Total discounts consume the entire basic price".to_string());
            }
        }
    }

    for (index, discount) in config.discounts.iter().enumerate() {
        let label = if discount.name.trim().is_empty() {
            format!("Discount {}", index + 1)
        } else {
            discount.name.clone()
        };
        if discount.value < Decimal::ZERO {
            errors.push(format!("{label}: Discount value cannot be negative"));
        }
        if discount.kind == DiscountKind::Percentage && discount.value > dec!(100) {
            errors.push(format!("{label}: Percentage discount cannot be greater than 100"));
        }
    }

    base.merge(ValidationReport::from_parts(errors, warnings))
}

fn validate_installments(plan: &[Installment], errors: &mut Vec<String>) {
    if plan.is_empty() {
        errors.push("At least one installment is required".to_string());
        return;
    }

    let total_percent = checked_sum(plan.iter().map(|i| i.percent_of_cost_value))
        .and_then(|total| Some((total, total.checked_sub(dec!(100))?)));
    match total_percent {
        Some((_, deviation)) if deviation.abs() <= PERCENT_TOLERANCE => {}
        Some((total_percent, _)) => errors.push(format!(
            "Installment percentages sum to {:.2}%. Must equal 100%",
            total_percent
        )),
        None => {
            errors.push("Installment percentages are out of range. Must equal 100%".to_string())
        }
    }

    let unnamed = plan.iter().filter(|i| i.name.trim().is_empty()).count();
    if unnamed > 0 {
        errors.push(format!("{unnamed} installment(s) missing name"));
    }

    for (index, inst) in plan.iter().enumerate() {
        if inst.percent_of_cost_value < Decimal::ZERO {
            errors.push(format!(
                "Installment {}: Percentage cannot be negative",
                index + 1
            ));
        }
        if inst.percent_of_cost_value > dec!(100) {
            errors.push(format!(
                "Installment {}: Percentage cannot be greater than 100",
                index + 1
            ));
        }
    }

    // Gaps between consecutive installments, in due order.
    let order = ScheduleOrder::new(plan);
    for index in 0..order.len() {
        if let (Some(inst), Some(next)) = (order.get(index), order.next(index)) {
            let gap = i64::from(next.months_from_booking) - i64::from(inst.months_from_booking);
            if gap < 0 {
                errors.push(format!(
                    "Installment {}: Interest months cannot be negative",
                    index + 1
                ));
            }
        }
    }
}

fn validate_rates(rates: &RateConfig, warnings: &mut Vec<String>) {
    if rates.gst_percent < Decimal::ZERO || rates.gst_percent > dec!(50) {
        warnings.push("GST rate seems unusual (typically 0-18%)".to_string());
    }
    if rates.registry_percent < Decimal::ZERO || rates.registry_percent > dec!(20) {
        warnings.push("Registry rate seems unusual (typically 3-10%)".to_string());
    }
    if rates.annual_interest_percent < Decimal::ZERO || rates.annual_interest_percent > dec!(30) {
        warnings.push("Interest rate seems unusual (typically 8-15%)".to_string());
    }
}

fn validate_discount_share(discounts: &[Discount], warnings: &mut Vec<String>) {
    let percentage_total = checked_sum(
        discounts
            .iter()
            .filter(|d| d.kind == DiscountKind::Percentage)
            .map(|d| d.value),
    );
    if percentage_total.map_or(true, |total| total > MAX_PERCENTAGE_DISCOUNT) {
        warnings.push("Total percentage discounts exceed 50%".to_string());
    }
}
