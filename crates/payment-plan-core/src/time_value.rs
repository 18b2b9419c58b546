use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::PaymentPlanError;
use crate::types::{Money, Months, Percent};
use crate::PaymentPlanResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// Convert an annual percentage (10 = 10% p.a.) to a monthly decimal rate.
pub fn monthly_rate(annual_percent: Percent) -> Decimal {
    annual_percent / HUNDRED / MONTHS_PER_YEAR
}

/// Simple (non-compounding) interest on `principal` for `months` months.
pub fn simple_interest(
    principal: Money,
    annual_percent: Percent,
    months: Months,
) -> PaymentPlanResult<Money> {
    principal
        .checked_mul(monthly_rate(annual_percent))
        .and_then(|v| v.checked_mul(Decimal::from(months)))
        .ok_or_else(|| PaymentPlanError::Overflow {
            context: format!("interest on {principal} over {months} months"),
        })
}

/// Discount factor (1 + r)^n for a non-negative monthly rate `r`, so always >= 1.
pub fn discount_factor(monthly: Decimal, months: Months) -> PaymentPlanResult<Decimal> {
    if monthly.is_sign_negative() {
        return Err(PaymentPlanError::InvalidInput {
            field: "cost_of_money_percent".into(),
            reason: "Discount rate cannot be negative".into(),
        });
    }

    (Decimal::ONE + monthly)
        .checked_powu(u64::from(months))
        .ok_or_else(|| PaymentPlanError::Overflow {
            context: format!("discount factor at month {months}"),
        })
}

/// Present value of a single cash flow paid `months` months from today.
pub fn present_value(cash_flow: Money, monthly: Decimal, months: Months) -> PaymentPlanResult<Money> {
    Ok(cash_flow / discount_factor(monthly, months)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
    }

    #[test]
    fn test_simple_interest_known_answer() {
        // 2,000,000 at 12% p.a. for 30 months = 600,000
        let result = simple_interest(dec!(2000000), dec!(12), 30).unwrap();
        assert_eq!(result, dec!(600000));
    }

    #[test]
    fn test_simple_interest_zero_months() {
        assert_eq!(simple_interest(dec!(500000), dec!(10), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_present_value_month_zero_is_nominal() {
        let pv = present_value(dec!(1000), dec!(0.01), 0).unwrap();
        assert_eq!(pv, dec!(1000));
    }

    #[test]
    fn test_present_value_one_year() {
        // 1% monthly for 12 months: 1000 / 1.01^12 ≈ 887.45
        let pv = present_value(dec!(1000), dec!(0.01), 12).unwrap();
        assert!((pv - dec!(887.45)).abs() < dec!(0.01));
    }

    #[test]
    fn test_simple_interest_overflow_is_an_error() {
        let err = simple_interest(Decimal::MAX, dec!(1200), 2).unwrap_err();
        assert!(matches!(err, PaymentPlanError::Overflow { .. }));
    }

    #[test]
    fn test_discount_factor_rejects_negative_rate() {
        assert!(discount_factor(dec!(-0.01), 3).is_err());
        assert_eq!(discount_factor(Decimal::ZERO, 3).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_discount_factor_overflow_is_an_error() {
        assert!(discount_factor(dec!(1000), 400).is_err());
    }
}
