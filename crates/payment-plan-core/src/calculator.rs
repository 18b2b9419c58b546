use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::PlanConfiguration;
use crate::error::PaymentPlanError;
use crate::parse;
use crate::plan::{apply_discounts, AppliedDiscount, DiscountApplication};
use crate::schedule::{
    compute_installments, AccrualPeriod, InstallmentBreakdown, InstallmentSchedule,
};
use crate::summary::{aggregate, Summary};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money};
use crate::validation::{validate_request, ValidationReport};
use crate::PaymentPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the basic price is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBasis {
    /// Basic price = area × rate
    PerUnitArea(Money),
    /// Basic price given directly; takes precedence over a per-unit rate
    Total(Money),
}

/// One immutable calculation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Saleable area (sq ft or m², matching the per-unit rates)
    #[serde(default, deserialize_with = "parse::decimal")]
    pub area: Decimal,
    #[serde(
        default,
        deserialize_with = "parse::optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_per_unit_area: Option<Money>,
    #[serde(
        default,
        deserialize_with = "parse::optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_price: Option<Money>,
    #[serde(default)]
    pub config: PlanConfiguration,
}

impl CalculationRequest {
    pub fn price_basis(&self) -> Option<PriceBasis> {
        match (self.total_price, self.price_per_unit_area) {
            (Some(total), _) => Some(PriceBasis::Total(total)),
            (None, Some(rate)) => Some(PriceBasis::PerUnitArea(rate)),
            (None, None) => None,
        }
    }

    /// Unrounded basic selling price, if any price was given. Fails only
    /// when area × rate does not fit a `Decimal`.
    pub fn basic_price(&self) -> PaymentPlanResult<Option<Money>> {
        match self.price_basis() {
            None => Ok(None),
            Some(PriceBasis::Total(total)) => Ok(Some(total)),
            Some(PriceBasis::PerUnitArea(rate)) => self
                .area
                .checked_mul(rate)
                .map(Some)
                .ok_or_else(|| PaymentPlanError::Overflow {
                    context: format!("basic price ({} × {rate})", self.area),
                }),
        }
    }

    /// The same plan with every amount zeroed, so nothing can overflow.
    fn zero_priced(&self) -> CalculationRequest {
        let mut config = self.config.clone();
        config.discounts.clear();
        CalculationRequest {
            area: Decimal::ZERO,
            price_per_unit_area: None,
            total_price: Some(Decimal::ZERO),
            config,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub basic_price: Money,
    pub discounts: Vec<AppliedDiscount>,
    pub total_discount_amount: Money,
    /// Basic price net of discounts; installment percentages apply to this
    pub cost_value: Money,
    pub price_per_unit_area_after_discount: Option<Money>,
    pub installments: Vec<InstallmentBreakdown>,
    pub accrual_periods: Vec<AccrualPeriod>,
    pub summary: Summary,
    pub validation: ValidationReport,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price, discount, schedule and summarise a plan.
///
/// Always produces figures; the attached validation report says whether they
/// should be trusted. Use [`calculate_checked`] to turn validation errors into
/// an `Err`. Amounts too large for `Decimal` are reported as a validation
/// error and the plan is computed on a zero cost value instead.
pub fn calculate(request: &CalculationRequest) -> ComputationOutput<CalculationResult> {
    let start = Instant::now();
    let mut validation = validate_request(request);

    let priced = match price_plan(request) {
        Ok(priced) => priced,
        Err(e) => {
            log::warn!("{e}; computing on a zero cost value");
            validation.push_error(format!(
                "Calculated amounts are out of range ({e}); figures shown use a zero cost value"
            ));
            price_plan(&request.zero_priced()).unwrap_or_default()
        }
    };

    let result = CalculationResult {
        basic_price: round_currency(priced.basic_price),
        discounts: priced.discounts.discounts,
        total_discount_amount: round_currency(priced.discounts.total_discount_amount),
        cost_value: round_currency(priced.cost_value),
        price_per_unit_area_after_discount: priced.price_per_unit_area_after_discount,
        installments: priced.schedule.installments,
        accrual_periods: priced.schedule.accrual_periods,
        summary: priced.summary,
        validation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let warnings = result.validation.warnings.clone();

    with_metadata(
        "Installment schedule with simple-interest accrual on cumulative principal",
        request,
        warnings,
        elapsed,
        result,
    )
}

/// Unrounded engine figures for one request.
#[derive(Debug, Default)]
struct PricedPlan {
    basic_price: Money,
    discounts: DiscountApplication,
    cost_value: Money,
    price_per_unit_area_after_discount: Option<Money>,
    schedule: InstallmentSchedule,
    summary: Summary,
}

fn price_plan(request: &CalculationRequest) -> PaymentPlanResult<PricedPlan> {
    let config = &request.config;
    let out_of_range = |what: &str| PaymentPlanError::Overflow {
        context: what.to_string(),
    };

    let basic_price = request.basic_price()?.unwrap_or(Decimal::ZERO);
    let discounts = apply_discounts(basic_price, &config.discounts)?;
    let cost_value = basic_price
        .checked_sub(discounts.total_discount_amount)
        .ok_or_else(|| out_of_range("cost value"))?;

    log::debug!(
        "calculating {} installments on cost value {}",
        config.installments.len(),
        cost_value
    );

    let mut schedule = compute_installments(cost_value, &config.installments, &config.rates)?;
    let summary = aggregate(&schedule, cost_value, &config.rates, request.area)?;

    if let Some(pv) = &summary.present_value {
        for (row, value) in schedule
            .installments
            .iter_mut()
            .zip(pv.installment_present_values.iter())
        {
            row.present_value = Some(*value);
        }
    }

    let price_per_unit_area_after_discount = if request.area > Decimal::ZERO {
        let per_area = cost_value
            .checked_div(request.area)
            .ok_or_else(|| out_of_range("price per unit area after discount"))?;
        Some(round_currency(per_area))
    } else {
        None
    };

    Ok(PricedPlan {
        basic_price,
        discounts,
        cost_value,
        price_per_unit_area_after_discount,
        schedule,
        summary,
    })
}

/// [`calculate`], failing with [`PaymentPlanError::ValidationFailed`] when the
/// request has validation errors.
pub fn calculate_checked(
    request: &CalculationRequest,
) -> PaymentPlanResult<ComputationOutput<CalculationResult>> {
    let output = calculate(request);
    if !output.result.validation.valid {
        return Err(PaymentPlanError::ValidationFailed {
            errors: output.result.validation.errors,
        });
    }
    Ok(output)
}
