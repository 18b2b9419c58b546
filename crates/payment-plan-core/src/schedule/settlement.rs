use rust_decimal::Decimal;

use super::accrual::AccrualPeriod;
use crate::error::PaymentPlanError;
use crate::plan::ScheduleOrder;
use crate::types::{checked_sum, round_currency, Money};
use crate::PaymentPlanResult;

/// Second pass: interest deducted at each installment.
///
/// A settling installment takes everything accrued over periods that closed
/// at or before it, minus what earlier settlements already took. Installments
/// that do not settle deduct nothing, and interest with no later settling
/// installment stays unsettled.
///
/// Period interest is rounded before it is summed, so a plan whose last
/// installment settles deducts exactly the total of the rounded accruals.
pub(crate) fn settle(
    order: &ScheduleOrder<'_>,
    periods: &[AccrualPeriod],
) -> PaymentPlanResult<Vec<Money>> {
    let mut already_settled = Decimal::ZERO;
    let mut settled = Vec::with_capacity(order.len());

    for (index, inst) in order.iter().enumerate() {
        if !inst.settle_accrued_interest {
            settled.push(Decimal::ZERO);
            continue;
        }
        let out_of_range = || PaymentPlanError::Overflow {
            context: format!("interest settled at installment '{}'", inst.name),
        };
        let accrued_up_to_here = checked_sum(
            periods
                .iter()
                .filter(|p| p.to_index <= index)
                .map(|p| round_currency(p.interest)),
        )
        .ok_or_else(out_of_range)?;
        let to_settle = accrued_up_to_here
            .checked_sub(already_settled)
            .ok_or_else(out_of_range)?;
        already_settled = accrued_up_to_here;
        settled.push(to_settle);
    }

    Ok(settled)
}
