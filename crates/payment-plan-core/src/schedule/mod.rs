//! Interest accrual and settlement across an installment plan.
//!
//! Early payments are capital the builder holds before possession. For every
//! gap between consecutive installments the buyer is credited simple interest
//! on everything paid so far; installments flagged for settlement deduct the
//! credit accumulated since the previous settlement.

pub mod accrual;
pub mod settlement;

use serde::{Deserialize, Serialize};

use crate::error::PaymentPlanError;
use crate::plan::{Installment, InstallmentId, RateConfig, ScheduleOrder};
use crate::types::{round_currency, Money, Months, Percent};
use crate::PaymentPlanResult;

pub use accrual::AccrualPeriod;

/// Per-installment output record. Monetary fields are whole currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentBreakdown {
    /// 1-based position in due order
    pub installment_number: usize,
    pub id: InstallmentId,
    pub name: String,
    pub due_at: String,
    pub months_from_booking: Months,
    pub percent_of_cost_value: Percent,
    pub base_amount: Money,

    /// Interest credited for the period from this installment to the next
    pub interest_accrued_this_period: Money,
    pub interest_months: Months,
    pub interest_rate_this_period: Percent,
    /// Cumulative base paid, including this installment
    pub interest_calculation_base: Money,

    pub apply_gst: bool,
    pub gst_rate: Percent,
    pub gst_amount: Money,
    pub gross_amount: Money,

    pub settle_accrued_interest: bool,
    pub interest_settled: Money,
    /// gross_amount − interest_settled, from the rounded fields
    pub net_payment: Money,

    /// Discounted net payment; present when a cost of money is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present_value: Option<Money>,
    pub notes: String,
}

/// Engine output: installment rows plus the accrual periods behind them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub installments: Vec<InstallmentBreakdown>,
    pub accrual_periods: Vec<AccrualPeriod>,
}

impl InstallmentSchedule {
    /// Month of the final installment in due order, 0 for an empty plan.
    pub fn final_month(&self) -> Months {
        self.installments
            .last()
            .map(|i| i.months_from_booking)
            .unwrap_or(0)
    }
}

/// Run both passes over `plan` and produce the rounded breakdown.
///
/// The plan is read in due order regardless of the order supplied. A plan
/// whose percentages are off still produces figures, and it is up to the
/// validator to flag them. The only failure is an amount too large for
/// `Decimal`.
pub fn compute_installments(
    cost_value: Money,
    plan: &[Installment],
    rates: &RateConfig,
) -> PaymentPlanResult<InstallmentSchedule> {
    let order = ScheduleOrder::new(plan);
    let pass = accrual::accrue(cost_value, &order, rates)?;
    let settled = settlement::settle(&order, &pass.periods)?;

    log::debug!(
        "accrued {} periods over {} installments",
        pass.periods.len(),
        order.len()
    );

    let installments = order
        .iter()
        .zip(pass.installments.iter())
        .zip(settled.iter())
        .enumerate()
        .map(|(index, ((inst, figures), settled))| {
            let gross_amount = round_currency(figures.gross_amount);
            let interest_settled = round_currency(*settled);
            let net_payment = gross_amount.checked_sub(interest_settled).ok_or_else(|| {
                PaymentPlanError::Overflow {
                    context: format!("net payment of installment '{}'", inst.name),
                }
            })?;
            Ok(InstallmentBreakdown {
                installment_number: index + 1,
                id: inst.id.clone(),
                name: inst.name.clone(),
                due_at: inst.due_at.clone(),
                months_from_booking: inst.months_from_booking,
                percent_of_cost_value: inst.percent_of_cost_value,
                base_amount: round_currency(figures.base_amount),
                interest_accrued_this_period: round_currency(figures.interest),
                interest_months: figures.interest_months,
                interest_rate_this_period: figures.period_rate,
                interest_calculation_base: round_currency(figures.cumulative_principal),
                apply_gst: inst.apply_gst,
                gst_rate: rates.gst_percent,
                gst_amount: round_currency(figures.gst_amount),
                gross_amount,
                settle_accrued_interest: inst.settle_accrued_interest,
                interest_settled,
                net_payment,
                present_value: None,
                notes: inst.notes.clone(),
            })
        })
        .collect::<PaymentPlanResult<Vec<_>>>()?;

    Ok(InstallmentSchedule {
        installments,
        accrual_periods: pass.periods.iter().map(AccrualPeriod::rounded).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn twenty_eighty(settle_at_possession: bool) -> Vec<Installment> {
        let mut possession = Installment::new("Possession", dec!(80), 30);
        possession.settle_accrued_interest = settle_at_possession;
        vec![
            Installment::new("Booking", dec!(20), 0).with_rate_for_next_period(dec!(12)),
            possession,
        ]
    }

    #[test]
    fn test_twenty_eighty_unsettled() {
        let rates = RateConfig::default();
        let schedule = compute_installments(dec!(10000000), &twenty_eighty(false), &rates).unwrap();
        let booking = &schedule.installments[0];
        let possession = &schedule.installments[1];

        assert_eq!(booking.base_amount, dec!(2000000));
        assert_eq!(booking.interest_accrued_this_period, dec!(600000));
        assert_eq!(booking.interest_rate_this_period, dec!(12));
        assert_eq!(booking.interest_months, 30);
        assert_eq!(possession.base_amount, dec!(8000000));
        assert!(possession.interest_accrued_this_period.is_zero());
        assert!(possession.interest_settled.is_zero());
        assert_eq!(possession.net_payment, possession.gross_amount);
    }

    #[test]
    fn test_twenty_eighty_settled_at_possession() {
        let rates = RateConfig::default();
        let schedule = compute_installments(dec!(10000000), &twenty_eighty(true), &rates).unwrap();
        let possession = &schedule.installments[1];
        assert_eq!(possession.interest_settled, dec!(600000));
        assert_eq!(possession.net_payment, possession.gross_amount - dec!(600000));
    }

    #[test]
    fn test_numbering_follows_due_order() {
        let plan = vec![
            Installment::new("Possession", dec!(90), 24),
            Installment::new("Booking", dec!(10), 0),
        ];
        let schedule = compute_installments(dec!(1000000), &plan, &RateConfig::default()).unwrap();
        assert_eq!(schedule.installments[0].name, "Booking");
        assert_eq!(schedule.installments[0].installment_number, 1);
        assert_eq!(schedule.installments[1].installment_number, 2);
        assert_eq!(schedule.final_month(), 24);
    }

    #[test]
    fn test_last_installment_reports_global_rate() {
        let schedule =
            compute_installments(dec!(10000000), &twenty_eighty(false), &RateConfig::default())
                .unwrap();
        assert_eq!(schedule.installments[1].interest_rate_this_period, dec!(10));
        assert_eq!(schedule.installments[1].interest_months, 0);
    }

    #[test]
    fn test_empty_plan() {
        let schedule = compute_installments(dec!(1000000), &[], &RateConfig::default()).unwrap();
        assert!(schedule.installments.is_empty());
        assert!(schedule.accrual_periods.is_empty());
        assert_eq!(schedule.final_month(), 0);
    }
}
