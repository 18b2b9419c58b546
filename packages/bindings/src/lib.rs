use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use payment_plan_core::calculator::{self, CalculationRequest};
use payment_plan_core::catalog;
use payment_plan_core::comparison::{self, ComparisonInput};
use payment_plan_core::config::{self, PlanConfiguration};
use payment_plan_core::parse;
use payment_plan_core::plan::{Discount, Installment};
use payment_plan_core::validation;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment_plan(input_json: String) -> NapiResult<String> {
    let input: CalculationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = calculator::calculate(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn validate_plan(config_json: String) -> NapiResult<String> {
    let input: PlanConfiguration = serde_json::from_str(&config_json).map_err(to_napi_error)?;
    let report = validation::validate(&input.installments, &input.rates, &input.discounts);
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn compare_plans(input_json: String) -> NapiResult<String> {
    let input: ComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        comparison::compare_plans(&input.base, &input.plans).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[napi]
pub fn export_configuration(config_json: String) -> NapiResult<String> {
    let input: PlanConfiguration = serde_json::from_str(&config_json).map_err(to_napi_error)?;
    config::export_configuration(&input).map_err(to_napi_error)
}

#[napi]
pub fn import_configuration(config_json: String) -> NapiResult<String> {
    let imported = config::import_configuration(&config_json).map_err(to_napi_error)?;
    serde_json::to_string(&imported).map_err(to_napi_error)
}

#[napi]
pub fn blank_installment() -> NapiResult<String> {
    serde_json::to_string(&Installment::blank()).map_err(to_napi_error)
}

#[napi]
pub fn blank_discount() -> NapiResult<String> {
    serde_json::to_string(&Discount::blank()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn list_templates() -> NapiResult<String> {
    serde_json::to_string(catalog::templates()).map_err(to_napi_error)
}

#[napi]
pub fn template_installments(key: String) -> NapiResult<String> {
    let template = catalog::template_or_error(&key).map_err(to_napi_error)?;
    serde_json::to_string(&template.to_installments()).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct StageScheduleInput {
    template: String,
    #[serde(deserialize_with = "parse::decimal")]
    property_price: Decimal,
}

#[napi]
pub fn stage_schedule(input_json: String) -> NapiResult<String> {
    let input: StageScheduleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let template = catalog::template_or_error(&input.template).map_err(to_napi_error)?;
    let schedule =
        catalog::stage_schedule(template, input.property_price).map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}
