use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PaymentPlanError;
use crate::schedule::InstallmentSchedule;
use crate::time_value::{monthly_rate, present_value};
use crate::types::{checked_sum, round_currency, Money, Months, Percent};
use crate::PaymentPlanResult;

/// Today's-money view of every cash flow in the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentValueFigures {
    pub cost_of_money_rate: Percent,
    /// Month at which registry and possession charges are assumed paid
    pub additional_charges_month: Months,
    /// Present value of each net installment payment, in due order
    pub installment_present_values: Vec<Money>,
    pub installments_present_value: Money,
    pub registry_present_value: Money,
    pub possession_present_value: Money,
    pub net_present_value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npv_per_unit_area: Option<Money>,
    /// grand_total − net_present_value
    pub savings_from_deferral: Money,
}

/// Discount net installment payments at their due months, and registry and
/// possession charges at the month of the final installment, monthly
/// compounding at the cost-of-money rate.
pub fn discount_cash_flows(
    schedule: &InstallmentSchedule,
    registry_amount: Money,
    possession_amount: Money,
    grand_total: Money,
    cost_of_money: Percent,
    area: Decimal,
) -> PaymentPlanResult<PresentValueFigures> {
    let monthly = monthly_rate(cost_of_money);
    let charges_month = schedule.final_month();

    let out_of_range = |what: &str| PaymentPlanError::Overflow {
        context: format!("present value {what}"),
    };

    let unrounded = schedule
        .installments
        .iter()
        .map(|inst| present_value(inst.net_payment, monthly, inst.months_from_booking))
        .collect::<PaymentPlanResult<Vec<_>>>()?;
    let installments_pv =
        checked_sum(unrounded.iter().copied()).ok_or_else(|| out_of_range("of installments"))?;
    let per_installment = unrounded.into_iter().map(round_currency).collect();

    let registry_pv = present_value(registry_amount, monthly, charges_month)?;
    let possession_pv = present_value(possession_amount, monthly, charges_month)?;
    let npv = checked_sum([installments_pv, registry_pv, possession_pv])
        .map(round_currency)
        .ok_or_else(|| out_of_range("total"))?;

    let npv_per_unit_area = if area > Decimal::ZERO {
        let per_area = npv
            .checked_div(area)
            .ok_or_else(|| out_of_range("per unit area"))?;
        Some(round_currency(per_area))
    } else {
        None
    };
    let savings_from_deferral = grand_total
        .checked_sub(npv)
        .ok_or_else(|| out_of_range("savings"))?;

    Ok(PresentValueFigures {
        cost_of_money_rate: cost_of_money,
        additional_charges_month: charges_month,
        installment_present_values: per_installment,
        installments_present_value: round_currency(installments_pv),
        registry_present_value: round_currency(registry_pv),
        possession_present_value: round_currency(possession_pv),
        net_present_value: npv,
        npv_per_unit_area,
        savings_from_deferral,
    })
}
