pub mod calculator;
pub mod config;
pub mod error;
pub mod parse;
pub mod plan;
pub mod schedule;
pub mod summary;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "catalog")]
pub mod catalog;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::PaymentPlanError;
pub use types::*;

/// Standard result type for all payment plan computations
pub type PaymentPlanResult<T> = Result<T, PaymentPlanError>;
