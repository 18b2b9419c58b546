//! Plan-level totals and the optional present-value analysis.

pub mod present_value;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PaymentPlanError;
use crate::plan::RateConfig;
use crate::schedule::{InstallmentBreakdown, InstallmentSchedule};
use crate::types::{checked_sum, round_currency, Money, Percent};
use crate::PaymentPlanResult;

pub use present_value::{discount_cash_flows, PresentValueFigures};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_base_amount: Money,
    pub total_interest_accrued: Money,
    pub total_interest_settled: Money,
    pub total_gst: Money,
    pub total_gross_amount: Money,
    pub total_net_payment: Money,
    pub registry_rate: Percent,
    pub registry_amount: Money,
    pub possession_charge_per_unit_area: Money,
    pub possession_amount: Money,
    /// Net installments + registry + possession, undiscounted
    pub grand_total: Money,
    /// Absent when the area is not positive
    pub effective_cost_per_unit_area: Option<Money>,
    /// Interest the buyer actually had deducted
    pub savings_from_interest: Money,
    /// Present only when the cost-of-money rate is positive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present_value: Option<PresentValueFigures>,
}

/// Sum the rounded installment rows and add the registry and possession
/// charges.
pub fn aggregate(
    schedule: &InstallmentSchedule,
    cost_value: Money,
    rates: &RateConfig,
    area: Decimal,
) -> PaymentPlanResult<Summary> {
    let rows = &schedule.installments;
    let total_base_amount = sum_by(rows, "base amount", |i| i.base_amount)?;
    let total_interest_accrued =
        sum_by(rows, "interest accrued", |i| i.interest_accrued_this_period)?;
    let total_interest_settled = sum_by(rows, "interest settled", |i| i.interest_settled)?;
    let total_gst = sum_by(rows, "GST", |i| i.gst_amount)?;
    let total_gross_amount = sum_by(rows, "gross amount", |i| i.gross_amount)?;
    let total_net_payment = sum_by(rows, "net payment", |i| i.net_payment)?;

    let registry_amount = cost_value
        .checked_mul(rates.registry_percent / dec!(100))
        .map(round_currency)
        .ok_or_else(|| out_of_range("registry charge"))?;
    let possession_amount = area
        .checked_mul(rates.possession_charge_per_unit_area)
        .map(round_currency)
        .ok_or_else(|| out_of_range("possession charge"))?;
    let grand_total = checked_sum([total_net_payment, registry_amount, possession_amount])
        .ok_or_else(|| out_of_range("grand total"))?;

    let effective_cost_per_unit_area = if area > Decimal::ZERO {
        let per_area = grand_total
            .checked_div(area)
            .ok_or_else(|| out_of_range("effective cost per unit area"))?;
        Some(round_currency(per_area))
    } else {
        log::warn!("area is {area}; effective cost per unit area left undefined");
        None
    };

    let present_value = if rates.cost_of_money_percent > Decimal::ZERO {
        match discount_cash_flows(
            schedule,
            registry_amount,
            possession_amount,
            grand_total,
            rates.cost_of_money_percent,
            area,
        ) {
            Ok(figures) => Some(figures),
            Err(e) => {
                log::warn!("present value analysis skipped: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(Summary {
        total_base_amount,
        total_interest_accrued,
        total_interest_settled,
        total_gst,
        total_gross_amount,
        total_net_payment,
        registry_rate: rates.registry_percent,
        registry_amount,
        possession_charge_per_unit_area: rates.possession_charge_per_unit_area,
        possession_amount,
        grand_total,
        effective_cost_per_unit_area,
        savings_from_interest: total_interest_settled,
        present_value,
    })
}

fn sum_by(
    rows: &[InstallmentBreakdown],
    what: &str,
    field: impl Fn(&InstallmentBreakdown) -> Money,
) -> PaymentPlanResult<Money> {
    checked_sum(rows.iter().map(field)).ok_or_else(|| out_of_range(&format!("total {what}")))
}

fn out_of_range(context: &str) -> PaymentPlanError {
    PaymentPlanError::Overflow {
        context: context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Installment;
    use crate::schedule::compute_installments;

    fn rates() -> RateConfig {
        RateConfig {
            gst_percent: dec!(5),
            registry_percent: dec!(7),
            annual_interest_percent: dec!(12),
            cost_of_money_percent: Decimal::ZERO,
            possession_charge_per_unit_area: dec!(250),
        }
    }

    #[test]
    fn test_grand_total_composition() {
        let plan = vec![
            Installment::new("Booking", dec!(20), 0).with_gst(),
            Installment::new("Possession", dec!(80), 30).settling(),
        ];
        let schedule = compute_installments(dec!(10000000), &plan, &rates()).unwrap();
        let summary = aggregate(&schedule, dec!(10000000), &rates(), dec!(1000)).unwrap();

        assert_eq!(summary.total_base_amount, dec!(10000000));
        assert_eq!(summary.total_gst, dec!(100000));
        assert_eq!(summary.total_interest_accrued, dec!(600000));
        assert_eq!(summary.total_interest_settled, dec!(600000));
        assert_eq!(summary.total_net_payment, dec!(9500000));
        assert_eq!(summary.registry_amount, dec!(700000));
        assert_eq!(summary.possession_amount, dec!(250000));
        assert_eq!(summary.grand_total, dec!(10450000));
        assert_eq!(summary.effective_cost_per_unit_area, Some(dec!(10450)));
        assert_eq!(summary.savings_from_interest, dec!(600000));
        assert!(summary.present_value.is_none());
    }

    #[test]
    fn test_zero_area_leaves_per_unit_undefined() {
        let plan = vec![Installment::new("Booking", dec!(100), 0)];
        let schedule = compute_installments(dec!(5000000), &plan, &rates()).unwrap();
        let summary = aggregate(&schedule, dec!(5000000), &rates(), Decimal::ZERO).unwrap();
        assert!(summary.effective_cost_per_unit_area.is_none());
        assert!(summary.possession_amount.is_zero());
    }

    #[test]
    fn test_npv_present_when_cost_of_money_positive() {
        let mut r = rates();
        r.cost_of_money_percent = dec!(8);
        let plan = vec![
            Installment::new("Booking", dec!(20), 0),
            Installment::new("Possession", dec!(80), 30),
        ];
        let schedule = compute_installments(dec!(10000000), &plan, &r).unwrap();
        let summary = aggregate(&schedule, dec!(10000000), &r, dec!(1000)).unwrap();
        let pv = summary.present_value.expect("npv expected");
        assert!(pv.net_present_value <= summary.grand_total);
        assert_eq!(pv.savings_from_deferral, summary.grand_total - pv.net_present_value);
    }

    #[test]
    fn test_oversized_area_is_an_error() {
        let schedule = InstallmentSchedule::default();
        let err = aggregate(&schedule, dec!(1000000), &rates(), Decimal::MAX).unwrap_err();
        assert!(matches!(err, PaymentPlanError::Overflow { .. }));
    }
}
