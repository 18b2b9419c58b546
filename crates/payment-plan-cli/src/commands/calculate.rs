use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use payment_plan_core::calculator::{self, CalculationRequest};
use payment_plan_core::catalog;
use payment_plan_core::config::{import_configuration, PlanConfiguration};
use payment_plan_core::plan::RateConfig;
use payment_plan_core::validation;

use super::amount;
use crate::input;

/// Rate overrides shared by the pricing commands.
#[derive(Args, Debug, Clone)]
pub struct RateArgs {
    /// GST percent applied to flagged installments
    #[arg(long, value_parser = amount)]
    pub gst: Option<Decimal>,

    /// Registry (stamp duty and registration) percent of cost value
    #[arg(long, value_parser = amount)]
    pub registry: Option<Decimal>,

    /// Annual interest percent credited on early payments
    #[arg(long, value_parser = amount)]
    pub interest: Option<Decimal>,

    /// Annual cost-of-money percent used for present values
    #[arg(long, value_parser = amount)]
    pub cost_of_money: Option<Decimal>,

    /// Possession charge per unit area
    #[arg(long, value_parser = amount)]
    pub possession_charge: Option<Decimal>,

    /// Skip the present-value analysis
    #[arg(long)]
    pub no_npv: bool,
}

impl RateArgs {
    pub fn apply(&self, rates: &mut RateConfig) {
        if let Some(v) = self.gst {
            rates.gst_percent = v;
        }
        if let Some(v) = self.registry {
            rates.registry_percent = v;
        }
        if let Some(v) = self.interest {
            rates.annual_interest_percent = v;
        }
        if let Some(v) = self.cost_of_money {
            rates.cost_of_money_percent = v;
        }
        if let Some(v) = self.possession_charge {
            rates.possession_charge_per_unit_area = v;
        }
        if self.no_npv {
            rates.cost_of_money_percent = dec!(0);
        }
    }
}

/// Arguments for a full plan calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to a JSON or YAML calculation request. Replaces the area, price
    /// and plan flags; rate flags and --settle-at-possession still apply
    #[arg(long)]
    pub input: Option<String>,

    /// Saleable area
    #[arg(long, value_parser = amount)]
    pub area: Option<Decimal>,

    /// Rate per unit area
    #[arg(long, value_parser = amount)]
    pub price_per_unit_area: Option<Decimal>,

    /// Total basic price; takes precedence over the per-unit rate
    #[arg(long, value_parser = amount)]
    pub total_price: Option<Decimal>,

    /// Built-in plan template to use
    #[arg(long, default_value = "standard")]
    pub template: String,

    /// Exported plan configuration (JSON) to use instead of a template
    #[arg(long)]
    pub config: Option<String>,

    /// Settle all accrued interest at the final installment
    #[arg(long)]
    pub settle_at_possession: bool,

    /// Fail when the plan has validation errors
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub rates: RateArgs,
}

/// Arguments for plan validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a JSON or YAML plan configuration
    #[arg(long)]
    pub input: Option<String>,

    /// Validate a built-in template's installments instead
    #[arg(long)]
    pub template: Option<String>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: CalculationRequest = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        request_from_flags(&args)?
    };
    apply_overrides(&args.rates, args.settle_at_possession, &mut request.config);

    if args.strict {
        let output = calculator::calculate_checked(&request)?;
        return Ok(serde_json::to_value(output)?);
    }
    let output = calculator::calculate(&request);
    if !output.result.validation.valid {
        log::warn!(
            "plan has {} validation error(s); figures may be unreliable",
            output.result.validation.errors.len()
        );
    }
    Ok(serde_json::to_value(output)?)
}

fn request_from_flags(args: &CalculateArgs) -> Result<CalculationRequest, Box<dyn std::error::Error>> {
    let area = args
        .area
        .ok_or("--area is required (or provide --input)")?;
    if args.price_per_unit_area.is_none() && args.total_price.is_none() {
        return Err("--price-per-unit-area or --total-price is required (or provide --input)".into());
    }

    let config = match args.config {
        Some(ref path) => import_configuration(&input::file::read_text(path)?)?,
        None => {
            let template = catalog::template_or_error(&args.template)?;
            PlanConfiguration {
                rates: RateConfig::default(),
                installments: template.to_installments(),
                discounts: vec![],
            }
        }
    };

    Ok(CalculationRequest {
        area,
        price_per_unit_area: args.price_per_unit_area,
        total_price: args.total_price,
        config,
    })
}

/// Command-line rate flags win over whatever the request carried.
pub(crate) fn apply_overrides(
    rates: &RateArgs,
    settle_at_possession: bool,
    config: &mut PlanConfiguration,
) {
    rates.apply(&mut config.rates);
    if settle_at_possession {
        // max_by_key keeps the last of equal months, matching due order
        if let Some(last) = config
            .installments
            .iter_mut()
            .max_by_key(|i| i.months_from_booking)
        {
            last.settle_accrued_interest = true;
        }
    }
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config: PlanConfiguration = if let Some(ref key) = args.template {
        let template = catalog::template_or_error(key)?;
        PlanConfiguration {
            installments: template.to_installments(),
            ..PlanConfiguration::default()
        }
    } else if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <plan.json>, --template <key> or stdin required for validation".into());
    };

    let report = validation::validate(&config.installments, &config.rates, &config.discounts);
    Ok(serde_json::json!({ "result": report }))
}
