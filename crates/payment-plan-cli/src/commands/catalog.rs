use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use payment_plan_core::catalog::{self, PlanTemplate};
use payment_plan_core::config::{export_configuration, PlanConfiguration};

use super::amount;

/// Arguments for showing one template
#[derive(Args)]
pub struct TemplateArgs {
    /// Template key, e.g. CLP or 20:80
    pub key: String,

    /// Print the template as an importable plan configuration instead
    #[arg(long)]
    pub export: bool,
}

/// Arguments for a plain percent-of-price schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Template key
    #[arg(long)]
    pub template: String,

    /// Property price
    #[arg(long, value_parser = amount)]
    pub price: Decimal,
}

pub fn run_templates() -> Result<Value, Box<dyn std::error::Error>> {
    let errors = catalog::validate_all_templates();
    let rows: Vec<Value> = catalog::templates()
        .iter()
        .map(|t| {
            json!({
                "key": t.key,
                "name": t.name,
                "stages": t.stages.len(),
                "min_stages": t.min_stages,
                "max_stages": t.max_stages,
                "valid": errors.get(t.key).map_or(true, |e| e.is_empty()),
                "description": t.description,
            })
        })
        .collect();
    Ok(json!({ "result": { "rows": rows } }))
}

pub fn run_template(args: TemplateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let template = catalog::template_or_error(&args.key)?;

    if args.export {
        let config = as_configuration(template);
        let exported: Value = serde_json::from_str(&export_configuration(&config)?)?;
        return Ok(exported);
    }

    Ok(json!({
        "result": {
            "key": template.key,
            "name": template.name,
            "description": template.description,
            "min_stages": template.min_stages,
            "max_stages": template.max_stages,
            "total_percent": template.total_percent(),
            "rows": template.stages,
        },
        "warnings": catalog::validate_template(template),
    }))
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let template = catalog::template_or_error(&args.template)?;
    let schedule = catalog::stage_schedule(template, args.price)?;
    Ok(json!({ "result": schedule }))
}

fn as_configuration(template: &PlanTemplate) -> PlanConfiguration {
    PlanConfiguration {
        installments: template.to_installments(),
        ..PlanConfiguration::default()
    }
}
