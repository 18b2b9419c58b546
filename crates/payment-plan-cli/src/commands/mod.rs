pub mod calculate;
pub mod catalog;
pub mod compare;

use rust_decimal::Decimal;

use payment_plan_core::parse::try_parse_amount;

/// clap value parser accepting grouped amounts such as `1,00,00,000`.
pub fn amount(raw: &str) -> Result<Decimal, String> {
    try_parse_amount(raw).ok_or_else(|| format!("'{raw}' is not a number"))
}
