//! Built-in plan templates: the common Indian builder plans (construction
//! linked, 20:80, flexi and so on) plus three GST-aware schedules.

mod templates;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::PaymentPlanError;
use crate::plan::Installment;
use crate::types::{checked_sum, round_currency, Money, Months, Percent};
use crate::PaymentPlanResult;

const STAGE_SUM_TOLERANCE: Decimal = dec!(0.01);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemplateStage {
    pub name: &'static str,
    pub percent: Percent,
    pub months_from_booking: Months,
    pub apply_gst: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Inclusive bounds on the number of stages a buyer may configure
    pub min_stages: usize,
    pub max_stages: usize,
    pub stages: &'static [TemplateStage],
}

impl PlanTemplate {
    /// Editable installments for this template, each with a fresh id.
    pub fn to_installments(&self) -> Vec<Installment> {
        self.stages
            .iter()
            .map(|stage| {
                let mut inst =
                    Installment::new(stage.name, stage.percent, stage.months_from_booking);
                inst.due_at = stage.name.to_string();
                inst.apply_gst = stage.apply_gst;
                inst
            })
            .collect()
    }

    pub fn total_percent(&self) -> Percent {
        self.stages.iter().map(|s| s.percent).sum()
    }
}

pub fn templates() -> &'static [PlanTemplate] {
    templates::TEMPLATES
}

pub fn find_template(key: &str) -> Option<&'static PlanTemplate> {
    templates::TEMPLATES.iter().find(|t| t.key == key)
}

pub fn template_or_error(key: &str) -> PaymentPlanResult<&'static PlanTemplate> {
    find_template(key).ok_or_else(|| PaymentPlanError::UnknownTemplate(key.to_string()))
}

/// Structural checks on a template. Returns every problem found.
pub fn validate_template(template: &PlanTemplate) -> Vec<String> {
    let mut errors = Vec::new();

    if template.name.trim().is_empty() {
        errors.push("Plan name is required".to_string());
    }
    if template.description.trim().is_empty() {
        errors.push("Plan description is required".to_string());
    }
    if template.stages.is_empty() {
        errors.push("Plan must have at least one stage".to_string());
        return errors;
    }

    for (index, stage) in template.stages.iter().enumerate() {
        if stage.name.trim().is_empty() {
            errors.push(format!("Stage {} is missing a name", index + 1));
        }
        if stage.percent <= Decimal::ZERO || stage.percent > dec!(100) {
            errors.push(format!(
                "Stage {}: percentage must be greater than 0 and at most 100",
                index + 1
            ));
        }
    }

    let total = template.total_percent();
    if (total - dec!(100)).abs() > STAGE_SUM_TOLERANCE {
        errors.push(format!("Stage percentages sum to {total}%, expected 100%"));
    }

    let count = template.stages.len();
    if count < template.min_stages || count > template.max_stages {
        errors.push(format!(
            "Plan has {count} stages; allowed range is {}-{}",
            template.min_stages, template.max_stages
        ));
    }

    errors
}

/// Validate every built-in template, keyed by template key. Valid templates
/// map to an empty list.
pub fn validate_all_templates() -> BTreeMap<&'static str, Vec<String>> {
    templates::TEMPLATES
        .iter()
        .map(|t| (t.key, validate_template(t)))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct StageAmount {
    pub installment_number: usize,
    pub stage: String,
    pub percent: Percent,
    pub months_from_booking: Months,
    pub amount: Money,
}

/// Percent-of-price schedule for a template, with no interest, GST or
/// charges applied.
#[derive(Debug, Clone, Serialize)]
pub struct StageSchedule {
    pub plan_key: String,
    pub plan_name: String,
    pub property_price: Money,
    pub installments: Vec<StageAmount>,
    /// Sum of the rounded stage amounts
    pub total_amount: Money,
}

pub fn stage_schedule(
    template: &PlanTemplate,
    property_price: Money,
) -> PaymentPlanResult<StageSchedule> {
    if property_price <= Decimal::ZERO {
        return Err(PaymentPlanError::InvalidInput {
            field: "property_price".into(),
            reason: "Property price must be a positive number".into(),
        });
    }

    let installments: Vec<StageAmount> = template
        .stages
        .iter()
        .enumerate()
        .map(|(index, stage)| StageAmount {
            installment_number: index + 1,
            stage: stage.name.to_string(),
            percent: stage.percent,
            months_from_booking: stage.months_from_booking,
            amount: round_currency(stage.percent / dec!(100) * property_price),
        })
        .collect();
    // Rounding up can push a price near Decimal::MAX past it
    let total_amount = checked_sum(installments.iter().map(|i| i.amount)).ok_or_else(|| {
        PaymentPlanError::Overflow {
            context: format!("stage total of '{}'", template.key),
        }
    })?;

    Ok(StageSchedule {
        plan_key: template.key.to_string(),
        plan_name: template.name.to_string(),
        property_price,
        installments,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_template_is_valid() {
        for (key, errors) in validate_all_templates() {
            assert!(errors.is_empty(), "{key}: {errors:?}");
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = templates().iter().map(|t| t.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), templates().len());
    }

    #[test]
    fn test_unknown_key() {
        assert!(find_template("40:60").is_none());
        assert!(matches!(
            template_or_error("40:60"),
            Err(PaymentPlanError::UnknownTemplate(k)) if k == "40:60"
        ));
    }

    #[test]
    fn test_to_installments_carries_gst_and_months() {
        let template = template_or_error("construction-linked").unwrap();
        let plan = template.to_installments();
        assert_eq!(plan.len(), 8);
        assert!(plan[0].apply_gst);
        assert!(!plan[7].apply_gst);
        assert_eq!(plan[7].months_from_booking, 30);
        assert!(plan.iter().all(|i| i.interest_rate_for_next_period.is_none()));
        assert_ne!(plan[0].id, plan[1].id);
    }

    #[test]
    fn test_validate_template_collects_problems() {
        static BAD_STAGES: &[TemplateStage] = &[
            TemplateStage {
                name: "",
                percent: dec!(0),
                months_from_booking: 0,
                apply_gst: false,
            },
            TemplateStage {
                name: "Rest",
                percent: dec!(90),
                months_from_booking: 12,
                apply_gst: false,
            },
        ];
        let bad = PlanTemplate {
            key: "bad",
            name: "Bad",
            description: "",
            min_stages: 3,
            max_stages: 4,
            stages: BAD_STAGES,
        };
        let errors = validate_template(&bad);
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().any(|e| e.contains("description")));
        assert!(errors.iter().any(|e| e.contains("sum to 90%")));
        assert!(errors.iter().any(|e| e.contains("allowed range is 3-4")));
    }

    #[test]
    fn test_stage_schedule_amounts() {
        let template = template_or_error("20:80").unwrap();
        let schedule = stage_schedule(template, dec!(7500000)).unwrap();
        assert_eq!(schedule.installments[0].amount, dec!(1500000));
        assert_eq!(schedule.installments[1].amount, dec!(6000000));
        assert_eq!(schedule.total_amount, dec!(7500000));
    }

    #[test]
    fn test_stage_schedule_rejects_non_positive_price() {
        let template = template_or_error("CLP").unwrap();
        assert!(stage_schedule(template, Decimal::ZERO).is_err());
        assert!(stage_schedule(template, dec!(-1)).is_err());
    }
}
