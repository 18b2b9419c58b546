use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PaymentPlanError;
use crate::parse;
use crate::types::{round_currency, Money};
use crate::PaymentPlanResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a percentage (0–100) of the basic price
    #[default]
    Percentage,
    /// `value` is an absolute currency amount
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: DiscountKind,
    #[serde(default, deserialize_with = "parse::decimal")]
    pub value: Decimal,
    #[serde(default)]
    pub notes: String,
}

impl Discount {
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            kind: DiscountKind::Percentage,
            value: Decimal::ZERO,
            notes: String::new(),
        }
    }

    pub fn percentage(name: impl Into<String>, percent: Decimal) -> Self {
        Self {
            name: name.into(),
            value: percent,
            ..Self::blank()
        }
    }

    pub fn fixed(name: impl Into<String>, amount: Money) -> Self {
        Self {
            name: name.into(),
            kind: DiscountKind::Fixed,
            value: amount,
            ..Self::blank()
        }
    }

    /// Currency amount this discount takes off `basic_price`.
    pub fn amount_on(&self, basic_price: Money) -> PaymentPlanResult<Money> {
        match self.kind {
            DiscountKind::Percentage => (self.value / dec!(100))
                .checked_mul(basic_price)
                .ok_or_else(|| PaymentPlanError::Overflow {
                    context: format!("discount '{}'", self.name),
                }),
            DiscountKind::Fixed => Ok(self.value),
        }
    }
}

/// A discount together with the amount it resolved to (rounded for display).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub name: String,
    pub kind: DiscountKind,
    pub value: Decimal,
    pub amount: Money,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct DiscountApplication {
    /// One entry per input discount, in input order
    pub discounts: Vec<AppliedDiscount>,
    /// Unrounded sum of all discount amounts
    pub total_discount_amount: Money,
}

impl DiscountApplication {
    /// Rounded amounts keyed by discount name; same-named discounts add up.
    pub fn amounts_by_name(&self) -> BTreeMap<String, Money> {
        let mut map = BTreeMap::new();
        for d in &self.discounts {
            *map.entry(d.name.clone()).or_insert(Decimal::ZERO) += d.amount;
        }
        map
    }
}

/// Resolve every discount against `basic_price`. The total is not clamped:
/// discounts exceeding the price are reported by the validator, not here.
pub fn apply_discounts(
    basic_price: Money,
    discounts: &[Discount],
) -> PaymentPlanResult<DiscountApplication> {
    let mut total = Decimal::ZERO;
    let mut applied = Vec::with_capacity(discounts.len());
    for d in discounts {
        let amount = d.amount_on(basic_price)?;
        total = total
            .checked_add(amount)
            .ok_or_else(|| PaymentPlanError::Overflow {
                context: "total discount".into(),
            })?;
        applied.push(AppliedDiscount {
            name: d.name.clone(),
            kind: d.kind,
            value: d.value,
            amount: round_currency(amount),
            notes: d.notes.clone(),
        });
    }

    Ok(DiscountApplication {
        discounts: applied,
        total_discount_amount: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_and_fixed() {
        let discounts = vec![
            Discount::percentage("Booking", dec!(2.5)),
            Discount::fixed("Gift", dec!(50000)),
        ];
        let result = apply_discounts(dec!(10000000), &discounts).unwrap();
        assert_eq!(result.discounts[0].amount, dec!(250000));
        assert_eq!(result.discounts[1].amount, dec!(50000));
        assert_eq!(result.total_discount_amount, dec!(300000));
    }

    #[test]
    fn test_empty_list_is_zero() {
        let result = apply_discounts(dec!(5000000), &[]).unwrap();
        assert!(result.total_discount_amount.is_zero());
        assert!(result.discounts.is_empty());
    }

    #[test]
    fn test_total_not_clamped() {
        let discounts = vec![Discount::fixed("Too generous", dec!(2000))];
        let result = apply_discounts(dec!(1000), &discounts).unwrap();
        assert_eq!(result.total_discount_amount, dec!(2000));
    }

    #[test]
    fn test_overflowing_discount_is_an_error() {
        let discounts = vec![
            Discount::fixed("Huge", Decimal::MAX),
            Discount::fixed("Huger", Decimal::MAX),
        ];
        assert!(apply_discounts(dec!(1000), &discounts).is_err());
        assert!(Discount::percentage("Wide", dec!(200))
            .amount_on(Decimal::MAX)
            .is_err());
    }

    #[test]
    fn test_amounts_by_name_merges_duplicates() {
        let discounts = vec![
            Discount::fixed("Promo", dec!(100)),
            Discount::fixed("Promo", dec!(50)),
        ];
        let map = apply_discounts(dec!(10000), &discounts)
            .unwrap()
            .amounts_by_name();
        assert_eq!(map.get("Promo"), Some(&dec!(150)));
    }

    #[test]
    fn test_kind_deserializes_snake_case() {
        let d: Discount =
            serde_json::from_str(r#"{"name": "CP", "kind": "fixed", "value": "1,50,000"}"#).unwrap();
        assert_eq!(d.kind, DiscountKind::Fixed);
        assert_eq!(d.value, dec!(150000));
    }
}
