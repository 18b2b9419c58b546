//! Side-by-side comparison of several installment plans for the same unit.

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calculator::{calculate, CalculationRequest, CalculationResult};
use crate::error::PaymentPlanError;
use crate::plan::Installment;
use crate::types::{checked_sum, with_metadata, ComputationOutput, Money, Percent};
use crate::PaymentPlanResult;

/// Number of leading installments counted as the early payment.
const EARLY_INSTALLMENTS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedPlan {
    pub name: String,
    pub installments: Vec<Installment>,
}

/// Shared pricing inputs plus the plans to compare. The installments of
/// `base.config` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub base: CalculationRequest,
    pub plans: Vec<NamedPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub installment_count: usize,
    pub booking_payment: Money,
    pub final_payment: Money,
    pub final_payment_percent: Percent,
    /// Net payments of the first two installments
    pub early_payment: Money,
    pub total_interest_settled: Money,
    pub grand_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_present_value: Option<Money>,
    pub valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFigure {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInsights {
    pub lowest_booking: PlanFigure,
    pub highest_final_payment: PlanFigure,
    pub highest_early_payment: PlanFigure,
    pub lowest_early_payment: PlanFigure,
    pub lowest_grand_total: PlanFigure,
    /// Absent unless a cost of money is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_net_present_value: Option<PlanFigure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanComparison {
    pub total_plans: usize,
    pub rows: Vec<ComparisonRow>,
    pub insights: ComparisonInsights,
}

pub fn compare_plans(
    base: &CalculationRequest,
    candidates: &[NamedPlan],
) -> PaymentPlanResult<ComputationOutput<PlanComparison>> {
    let start = Instant::now();
    if candidates.is_empty() {
        return Err(PaymentPlanError::InsufficientData(
            "At least one plan is required for comparison".into(),
        ));
    }

    let rows: Vec<ComparisonRow> = candidates
        .par_iter()
        .map(|candidate| {
            let mut request = base.clone();
            request.config.installments = candidate.installments.clone();
            let output = calculate(&request);
            summarise(&candidate.name, &output.result)
        })
        .collect::<PaymentPlanResult<Vec<_>>>()?;

    let mut warnings = Vec::new();
    for row in rows.iter().filter(|r| !r.valid) {
        warnings.push(format!(
            "{}: plan has validation errors ({})",
            row.name,
            row.errors.join("; ")
        ));
    }
    log::debug!("compared {} plans, {} invalid", rows.len(), warnings.len());

    let insights = derive_insights(&rows);
    let comparison = PlanComparison {
        total_plans: rows.len(),
        rows,
        insights,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Per-plan installment schedules on shared pricing, ranked by cash-flow timing",
        &ComparisonInput {
            base: base.clone(),
            plans: candidates.to_vec(),
        },
        warnings,
        elapsed,
        comparison,
    ))
}

fn summarise(name: &str, result: &CalculationResult) -> PaymentPlanResult<ComparisonRow> {
    let rows = &result.installments;
    let booking_payment = rows.first().map(|i| i.net_payment).unwrap_or(Decimal::ZERO);
    let (final_payment, final_payment_percent) = rows
        .last()
        .map(|i| (i.net_payment, i.percent_of_cost_value))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));
    let early_payment = checked_sum(rows.iter().take(EARLY_INSTALLMENTS).map(|i| i.net_payment))
        .ok_or_else(|| PaymentPlanError::Overflow {
            context: format!("early payment of plan '{name}'"),
        })?;

    Ok(ComparisonRow {
        name: name.to_string(),
        installment_count: rows.len(),
        booking_payment,
        final_payment,
        final_payment_percent,
        early_payment,
        total_interest_settled: result.summary.total_interest_settled,
        grand_total: result.summary.grand_total,
        net_present_value: result
            .summary
            .present_value
            .as_ref()
            .map(|pv| pv.net_present_value),
        valid: result.validation.valid,
        errors: result.validation.errors.clone(),
    })
}

/// Ties go to the plan listed first.
fn pick(
    rows: &[ComparisonRow],
    figure: impl Fn(&ComparisonRow) -> Option<Money>,
    prefer_higher: bool,
) -> Option<PlanFigure> {
    let mut best: Option<PlanFigure> = None;
    for row in rows {
        let Some(amount) = figure(row) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some(current) if prefer_higher => amount > current.amount,
            Some(current) => amount < current.amount,
        };
        if better {
            best = Some(PlanFigure {
                name: row.name.clone(),
                amount,
            });
        }
    }
    best
}

fn pick_required(
    rows: &[ComparisonRow],
    figure: impl Fn(&ComparisonRow) -> Money,
    prefer_higher: bool,
) -> PlanFigure {
    pick(rows, |r| Some(figure(r)), prefer_higher).unwrap_or(PlanFigure {
        name: String::new(),
        amount: Decimal::ZERO,
    })
}

fn derive_insights(rows: &[ComparisonRow]) -> ComparisonInsights {
    ComparisonInsights {
        lowest_booking: pick_required(rows, |r| r.booking_payment, false),
        highest_final_payment: pick_required(rows, |r| r.final_payment, true),
        highest_early_payment: pick_required(rows, |r| r.early_payment, true),
        lowest_early_payment: pick_required(rows, |r| r.early_payment, false),
        lowest_grand_total: pick_required(rows, |r| r.grand_total, false),
        lowest_net_present_value: pick(rows, |r| r.net_present_value, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfiguration;
    use crate::plan::RateConfig;
    use rust_decimal_macros::dec;

    fn base() -> CalculationRequest {
        CalculationRequest {
            area: dec!(1000),
            price_per_unit_area: Some(dec!(10000)),
            total_price: None,
            config: PlanConfiguration {
                rates: RateConfig::default(),
                installments: vec![],
                discounts: vec![],
            },
        }
    }

    fn candidates() -> Vec<NamedPlan> {
        vec![
            NamedPlan {
                name: "20:80".into(),
                installments: vec![
                    Installment::new("Booking", dec!(20), 0),
                    Installment::new("Possession", dec!(80), 36),
                ],
            },
            NamedPlan {
                name: "10:90".into(),
                installments: vec![
                    Installment::new("Booking", dec!(10), 0),
                    Installment::new("Possession", dec!(90), 36),
                ],
            },
        ]
    }

    #[test]
    fn test_empty_candidates_rejected() {
        assert!(matches!(
            compare_plans(&base(), &[]),
            Err(PaymentPlanError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_rows_follow_candidate_order() {
        let out = compare_plans(&base(), &candidates()).unwrap();
        let names: Vec<_> = out.result.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["20:80", "10:90"]);
        assert_eq!(out.result.total_plans, 2);
        assert_eq!(out.result.rows[0].booking_payment, dec!(2000000));
        assert_eq!(out.result.rows[1].final_payment_percent, dec!(90));
    }

    #[test]
    fn test_insights() {
        let out = compare_plans(&base(), &candidates()).unwrap();
        let insights = &out.result.insights;
        assert_eq!(insights.lowest_booking.name, "10:90");
        assert_eq!(insights.highest_final_payment.name, "10:90");
        // Both two-stage plans pay everything within their first two
        // installments, so the early-payment tie goes to the first plan.
        assert_eq!(insights.highest_early_payment.name, "20:80");
        assert_eq!(insights.lowest_early_payment.name, "20:80");
        assert_eq!(insights.lowest_early_payment.amount, dec!(10000000));
        assert!(insights.lowest_net_present_value.is_some());
    }

    #[test]
    fn test_invalid_plan_flagged_in_warnings() {
        let mut plans = candidates();
        plans.push(NamedPlan {
            name: "Broken".into(),
            installments: vec![Installment::new("Booking", dec!(50), 0)],
        });
        let out = compare_plans(&base(), &plans).unwrap();
        assert!(!out.result.rows[2].valid);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].starts_with("Broken:"));
    }

    #[test]
    fn test_ties_go_to_first_plan() {
        let rows = vec![
            ComparisonRow {
                name: "A".into(),
                installment_count: 1,
                booking_payment: dec!(100),
                final_payment: dec!(100),
                final_payment_percent: dec!(100),
                early_payment: dec!(100),
                total_interest_settled: Decimal::ZERO,
                grand_total: dec!(100),
                net_present_value: None,
                valid: true,
                errors: vec![],
            },
        ];
        let mut twice = rows.clone();
        twice.push(ComparisonRow {
            name: "B".into(),
            ..rows[0].clone()
        });
        let insights = derive_insights(&twice);
        assert_eq!(insights.lowest_booking.name, "A");
        assert_eq!(insights.highest_final_payment.name, "A");
        assert!(insights.lowest_net_present_value.is_none());
    }
}
