use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payment_plan_core::calculator::CalculationRequest;
use payment_plan_core::catalog;
use payment_plan_core::comparison::{self, ComparisonInput, NamedPlan};
use payment_plan_core::config::PlanConfiguration;

use super::amount;
use super::calculate::RateArgs;
use crate::input;

/// Arguments for comparing plans on the same unit
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML comparison input (`base` request plus `plans`).
    /// Rate flags still apply to the base request
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated template keys to compare
    #[arg(long, value_delimiter = ',', default_value = "CLP,20:80,10:90")]
    pub templates: Vec<String>,

    /// Saleable area
    #[arg(long, value_parser = amount)]
    pub area: Option<Decimal>,

    /// Rate per unit area
    #[arg(long, value_parser = amount)]
    pub price_per_unit_area: Option<Decimal>,

    /// Total basic price
    #[arg(long, value_parser = amount)]
    pub total_price: Option<Decimal>,

    #[command(flatten)]
    pub rates: RateArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut comparison_input: ComparisonInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        input_from_flags(&args)?
    };
    args.rates.apply(&mut comparison_input.base.config.rates);

    let result = comparison::compare_plans(&comparison_input.base, &comparison_input.plans)?;
    Ok(serde_json::to_value(result)?)
}

fn input_from_flags(args: &CompareArgs) -> Result<ComparisonInput, Box<dyn std::error::Error>> {
    let area = args
        .area
        .ok_or("--area is required (or provide --input)")?;
    if args.price_per_unit_area.is_none() && args.total_price.is_none() {
        return Err("--price-per-unit-area or --total-price is required (or provide --input)".into());
    }

    let plans = args
        .templates
        .iter()
        .map(|key| {
            let template = catalog::template_or_error(key.trim())?;
            Ok(NamedPlan {
                name: template.name.to_string(),
                installments: template.to_installments(),
            })
        })
        .collect::<Result<Vec<_>, payment_plan_core::PaymentPlanError>>()?;

    Ok(ComparisonInput {
        base: CalculationRequest {
            area,
            price_per_unit_area: args.price_per_unit_area,
            total_price: args.total_price,
            config: PlanConfiguration::default(),
        },
        plans,
    })
}
