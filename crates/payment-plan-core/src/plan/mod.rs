//! Caller-owned inputs: rates, installments and discounts.

pub mod discount;
pub mod installment;
pub mod rates;

pub use discount::{apply_discounts, AppliedDiscount, Discount, DiscountApplication, DiscountKind};
pub use installment::{Installment, InstallmentId, ScheduleOrder};
pub use rates::RateConfig;
