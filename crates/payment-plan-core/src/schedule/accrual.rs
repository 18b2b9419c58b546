use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PaymentPlanError;
use crate::plan::{InstallmentId, RateConfig, ScheduleOrder};
use crate::time_value::simple_interest;
use crate::types::{round_currency, Money, Months, Percent};
use crate::PaymentPlanResult;

/// Interest credited to the buyer between two consecutive installments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualPeriod {
    /// Position (0-based, due order) of the installment opening the period
    pub from_index: usize,
    /// Position of the installment closing the period
    pub to_index: usize,
    pub from_installment: InstallmentId,
    pub to_installment: InstallmentId,
    /// Cumulative base amount paid up to and including `from_index`
    pub principal: Money,
    /// Annual rate applied (percent)
    pub annual_rate: Percent,
    pub months: Months,
    pub interest: Money,
}

impl AccrualPeriod {
    /// Copy with monetary fields rounded for presentation.
    pub fn rounded(&self) -> AccrualPeriod {
        AccrualPeriod {
            principal: round_currency(self.principal),
            interest: round_currency(self.interest),
            ..self.clone()
        }
    }
}

/// Unrounded first-pass figures for one installment.
#[derive(Debug, Clone)]
pub(crate) struct AccruedInstallment {
    pub base_amount: Money,
    pub gst_amount: Money,
    pub gross_amount: Money,
    pub cumulative_principal: Money,
    pub interest_months: Months,
    pub period_rate: Percent,
    pub interest: Money,
}

#[derive(Debug, Clone)]
pub(crate) struct AccrualPass {
    pub installments: Vec<AccruedInstallment>,
    pub periods: Vec<AccrualPeriod>,
}

/// First pass: base, GST and gross per installment, plus simple interest on
/// the running principal for the gap to the next installment.
pub(crate) fn accrue(
    cost_value: Money,
    order: &ScheduleOrder<'_>,
    rates: &RateConfig,
) -> PaymentPlanResult<AccrualPass> {
    let mut cumulative_principal = Decimal::ZERO;
    let mut installments = Vec::with_capacity(order.len());
    let mut periods = Vec::new();

    for (index, inst) in order.iter().enumerate() {
        let out_of_range = |what: &str| PaymentPlanError::Overflow {
            context: format!("{what} of installment '{}'", inst.name),
        };

        let base_amount = (inst.percent_of_cost_value / dec!(100))
            .checked_mul(cost_value)
            .ok_or_else(|| out_of_range("base amount"))?;
        let gst_amount = if inst.apply_gst {
            base_amount
                .checked_mul(rates.gst_percent / dec!(100))
                .ok_or_else(|| out_of_range("GST"))?
        } else {
            Decimal::ZERO
        };
        let gross_amount = base_amount
            .checked_add(gst_amount)
            .ok_or_else(|| out_of_range("gross amount"))?;

        // GST is not capital held by the builder
        cumulative_principal = cumulative_principal
            .checked_add(base_amount)
            .ok_or_else(|| out_of_range("principal paid"))?;

        let mut interest = Decimal::ZERO;
        let mut interest_months = 0;
        let mut period_rate = rates.annual_interest_percent;

        if let Some(next) = order.next(index) {
            period_rate = inst
                .interest_rate_for_next_period
                .unwrap_or(rates.annual_interest_percent);
            interest_months = next
                .months_from_booking
                .saturating_sub(inst.months_from_booking);

            if interest_months > 0 && cumulative_principal > Decimal::ZERO {
                interest = simple_interest(cumulative_principal, period_rate, interest_months)?;
                periods.push(AccrualPeriod {
                    from_index: index,
                    to_index: index + 1,
                    from_installment: inst.id.clone(),
                    to_installment: next.id.clone(),
                    principal: cumulative_principal,
                    annual_rate: period_rate,
                    months: interest_months,
                    interest,
                });
            }
        }

        installments.push(AccruedInstallment {
            base_amount,
            gst_amount,
            gross_amount,
            cumulative_principal,
            interest_months,
            period_rate,
            interest,
        });
    }

    Ok(AccrualPass {
        installments,
        periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Installment;

    fn rates() -> RateConfig {
        RateConfig {
            gst_percent: dec!(5),
            annual_interest_percent: dec!(10),
            ..RateConfig::default()
        }
    }

    #[test]
    fn test_interest_on_post_payment_principal() {
        let plan = vec![
            Installment::new("Booking", dec!(10), 0),
            Installment::new("Slab", dec!(40), 12),
            Installment::new("Possession", dec!(50), 24),
        ];
        let order = ScheduleOrder::new(&plan);
        let pass = accrue(dec!(1200000), &order, &rates()).unwrap();

        // Period 1: 120,000 × 10%/12 × 12 = 12,000
        assert_eq!(round_currency(pass.installments[0].interest), dec!(12000));
        // Period 2: 600,000 × 10%/12 × 12 = 60,000
        assert_eq!(round_currency(pass.installments[1].interest), dec!(60000));
        assert!(pass.installments[2].interest.is_zero());
        assert_eq!(pass.periods.len(), 2);
        assert_eq!(pass.periods[1].principal, dec!(600000));
    }

    #[test]
    fn test_gst_excluded_from_principal() {
        let plan = vec![
            Installment::new("Booking", dec!(50), 0).with_gst(),
            Installment::new("Possession", dec!(50), 12),
        ];
        let order = ScheduleOrder::new(&plan);
        let pass = accrue(dec!(1000000), &order, &rates()).unwrap();
        assert_eq!(pass.installments[0].gst_amount, dec!(25000));
        assert_eq!(pass.installments[0].gross_amount, dec!(525000));
        assert_eq!(pass.installments[0].cumulative_principal, dec!(500000));
    }

    #[test]
    fn test_same_month_installments_record_no_period() {
        let plan = vec![
            Installment::new("Booking", dec!(10), 0),
            Installment::new("Top-up", dec!(10), 0),
            Installment::new("Possession", dec!(80), 6),
        ];
        let order = ScheduleOrder::new(&plan);
        let pass = accrue(dec!(1000000), &order, &rates()).unwrap();
        assert_eq!(pass.periods.len(), 1);
        assert_eq!(pass.periods[0].from_index, 1);
        assert_eq!(pass.periods[0].principal, dec!(200000));
    }

    #[test]
    fn test_zero_override_is_honoured() {
        let plan = vec![
            Installment::new("Booking", dec!(20), 0).with_rate_for_next_period(Decimal::ZERO),
            Installment::new("Possession", dec!(80), 30),
        ];
        let order = ScheduleOrder::new(&plan);
        let pass = accrue(dec!(1000000), &order, &rates()).unwrap();
        assert!(pass.installments[0].interest.is_zero());
        assert_eq!(pass.installments[0].period_rate, Decimal::ZERO);
        assert_eq!(pass.periods.len(), 1);
        assert!(pass.periods[0].interest.is_zero());
    }

    #[test]
    fn test_oversized_percentage_is_an_error() {
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let plan = vec![
            Installment::new("Booking", huge, 0),
            Installment::new("Possession", huge, 12),
        ];
        let order = ScheduleOrder::new(&plan);
        let err = accrue(dec!(10000000), &order, &rates()).unwrap_err();
        assert!(matches!(err, PaymentPlanError::Overflow { .. }));
    }
}
