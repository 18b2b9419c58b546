use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::parse;
use crate::types::{Months, Percent};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Opaque installment identifier, unique within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallmentId(pub String);

impl InstallmentId {
    /// Generate a fresh identifier from the wall clock and a process-local
    /// sequence, so two ids minted in the same nanosecond still differ.
    pub fn fresh() -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        InstallmentId(format!("inst-{nanos:x}-{seq}"))
    }
}

impl fmt::Display for InstallmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstallmentId {
    fn from(value: &str) -> Self {
        InstallmentId(value.to_string())
    }
}

/// One payment milestone in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    #[serde(default = "InstallmentId::fresh")]
    pub id: InstallmentId,
    #[serde(default)]
    pub name: String,
    /// Free-text milestone label ("On Booking", "Roof Slab")
    #[serde(default)]
    pub due_at: String,
    /// Share of the cost value due at this milestone (0–100)
    #[serde(default, deserialize_with = "parse::decimal")]
    pub percent_of_cost_value: Percent,
    #[serde(default, deserialize_with = "parse::months")]
    pub months_from_booking: Months,
    /// Annual rate for the period from this installment to the next.
    /// `None` inherits the global rate; `Some(0)` means no interest.
    #[serde(default, deserialize_with = "parse::optional_decimal")]
    pub interest_rate_for_next_period: Option<Percent>,
    /// Deduct all interest accrued so far (and not yet deducted) here
    #[serde(default)]
    pub settle_accrued_interest: bool,
    #[serde(default)]
    pub apply_gst: bool,
    #[serde(default)]
    pub notes: String,
}

impl Installment {
    /// An empty installment with a fresh identifier.
    pub fn blank() -> Self {
        Self {
            id: InstallmentId::fresh(),
            name: String::new(),
            due_at: String::new(),
            percent_of_cost_value: Decimal::ZERO,
            months_from_booking: 0,
            interest_rate_for_next_period: None,
            settle_accrued_interest: false,
            apply_gst: false,
            notes: String::new(),
        }
    }

    /// Convenience constructor for the common fields.
    pub fn new(name: impl Into<String>, percent_of_cost_value: Percent, months_from_booking: Months) -> Self {
        Self {
            name: name.into(),
            percent_of_cost_value,
            months_from_booking,
            ..Self::blank()
        }
    }

    pub fn with_rate_for_next_period(mut self, rate: Percent) -> Self {
        self.interest_rate_for_next_period = Some(rate);
        self
    }

    pub fn settling(mut self) -> Self {
        self.settle_accrued_interest = true;
        self
    }

    pub fn with_gst(mut self) -> Self {
        self.apply_gst = true;
        self
    }
}

/// Installments in due order: ascending `months_from_booking`, ties kept in
/// caller order.
#[derive(Debug, Clone)]
pub struct ScheduleOrder<'a> {
    entries: Vec<&'a Installment>,
}

impl<'a> ScheduleOrder<'a> {
    pub fn new(plan: &'a [Installment]) -> Self {
        let mut entries: Vec<&Installment> = plan.iter().collect();
        // sort_by_key is stable
        entries.sort_by_key(|inst| inst.months_from_booking);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Installment> {
        self.entries.get(index).copied()
    }

    /// The installment due after the one at `index`, if any.
    pub fn next(&self, index: usize) -> Option<&'a Installment> {
        self.get(index + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Installment> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = InstallmentId::fresh();
        let b = InstallmentId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_is_stable_on_ties() {
        let plan = vec![
            Installment::new("Possession", dec!(50), 30),
            Installment::new("Booking A", dec!(25), 0),
            Installment::new("Booking B", dec!(25), 0),
        ];
        let order = ScheduleOrder::new(&plan);
        let names: Vec<&str> = order.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Booking A", "Booking B", "Possession"]);
        assert_eq!(order.next(1).map(|i| i.name.as_str()), Some("Possession"));
        assert!(order.next(2).is_none());
    }

    #[test]
    fn test_override_serializes_as_explicit_null() {
        let inst = Installment::new("Booking", dec!(10), 0);
        let json = serde_json::to_value(&inst).unwrap();
        assert!(json["interest_rate_for_next_period"].is_null());
        assert!(json
            .as_object()
            .unwrap()
            .contains_key("interest_rate_for_next_period"));
    }

    #[test]
    fn test_deserialize_lenient_fields() {
        let inst: Installment = serde_json::from_str(
            r#"{
                "name": "Booking",
                "percent_of_cost_value": "20",
                "months_from_booking": "6",
                "interest_rate_for_next_period": "",
                "apply_gst": true
            }"#,
        )
        .unwrap();
        assert_eq!(inst.percent_of_cost_value, dec!(20));
        assert_eq!(inst.months_from_booking, 6);
        assert_eq!(inst.interest_rate_for_next_period, None);
        assert!(inst.apply_gst);
        assert!(!inst.id.0.is_empty());
    }

    #[test]
    fn test_zero_override_is_not_absent() {
        let inst: Installment =
            serde_json::from_str(r#"{"name": "x", "interest_rate_for_next_period": 0}"#).unwrap();
        assert_eq!(inst.interest_rate_for_next_period, Some(Decimal::ZERO));
    }
}
