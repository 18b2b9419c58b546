use rust_decimal_macros::dec;

use super::{PlanTemplate, TemplateStage};

const fn stage(
    name: &'static str,
    percent: rust_decimal::Decimal,
    months_from_booking: u32,
    apply_gst: bool,
) -> TemplateStage {
    TemplateStage {
        name,
        percent,
        months_from_booking,
        apply_gst,
    }
}

// Stage-linked plans quote milestones without dates; the months below place
// each milestone on a typical 36-month construction timeline.

const CLP_STAGES: &[TemplateStage] = &[
    stage("Booking", dec!(10), 0, false),
    stage("Within 30 days", dec!(10), 1, false),
    stage("Foundation complete", dec!(5), 3, false),
    stage("1st Floor Slab", dec!(5), 6, false),
    stage("2nd Floor Slab", dec!(5), 9, false),
    stage("3rd Floor Slab", dec!(5), 12, false),
    stage("4th Floor Slab", dec!(5), 15, false),
    stage("5th Floor Slab", dec!(5), 18, false),
    stage("Roof Slab", dec!(5), 21, false),
    stage("Brickwork", dec!(5), 24, false),
    stage("Plastering", dec!(5), 27, false),
    stage("Flooring", dec!(5), 30, false),
    stage("Finishing Work", dec!(10), 33, false),
    stage("Possession", dec!(20), 36, false),
];

const TWENTY_EIGHTY_STAGES: &[TemplateStage] = &[
    stage("Booking", dec!(20), 0, false),
    stage("On Possession", dec!(80), 36, false),
];

const TEN_NINETY_STAGES: &[TemplateStage] = &[
    stage("Booking", dec!(10), 0, false),
    stage("On Possession", dec!(90), 36, false),
];

const DOWN_PAYMENT_STAGES: &[TemplateStage] = &[
    stage("Booking", dec!(10), 0, false),
    stage("Within 30 days", dec!(80), 1, false),
    stage("On Possession", dec!(10), 36, false),
];

const FLEXI_30_70_STAGES: &[TemplateStage] = &[
    stage("Booking", dec!(10), 0, false),
    stage("Within 60 days", dec!(20), 2, false),
    stage("On Possession", dec!(70), 36, false),
];

const FLEXI_50_50_STAGES: &[TemplateStage] = &[
    stage("Booking", dec!(10), 0, false),
    stage("Within 3 months", dec!(40), 3, false),
    stage("On Possession", dec!(50), 36, false),
];

const TIME_LINKED_STAGES: &[TemplateStage] = &[
    stage("Month 0 (Booking)", dec!(20), 0, false),
    stage("Month 6", dec!(20), 6, false),
    stage("Month 12", dec!(20), 12, false),
    stage("Month 18", dec!(20), 18, false),
    stage("Month 24", dec!(20), 24, false),
];

const STANDARD_STAGES: &[TemplateStage] = &[
    stage("First Installment (Booking & 1st Year)", dec!(10), 0, true),
    stage("Second Installment (Super Structure)", dec!(13), 12, true),
    stage("Third Installment (OC)", dec!(67), 24, false),
    stage("Fourth Installment (Possession)", dec!(10), 30, false),
];

const CONSTRUCTION_LINKED_STAGES: &[TemplateStage] = &[
    stage("Booking", dec!(10), 0, true),
    stage("Foundation", dec!(5), 3, true),
    stage("Plinth", dec!(5), 6, true),
    stage("First Floor Slab", dec!(10), 9, true),
    stage("Roof Slab", dec!(15), 15, true),
    stage("Plastering", dec!(15), 20, false),
    stage("OC", dec!(30), 24, false),
    stage("Possession", dec!(10), 30, false),
];

const POSSESSION_LINKED_STAGES: &[TemplateStage] = &[
    stage("Booking (20%)", dec!(20), 0, true),
    stage("On Possession (80%)", dec!(80), 30, false),
];

pub(super) static TEMPLATES: &[PlanTemplate] = &[
    PlanTemplate {
        key: "CLP",
        name: "Construction Linked Plan",
        description: "Payments tied to construction milestones, floor by floor",
        min_stages: 3,
        max_stages: 20,
        stages: CLP_STAGES,
    },
    PlanTemplate {
        key: "20:80",
        name: "20:80 Plan",
        description: "20% at booking, 80% on possession",
        min_stages: 2,
        max_stages: 2,
        stages: TWENTY_EIGHTY_STAGES,
    },
    PlanTemplate {
        key: "10:90",
        name: "10:90 Plan",
        description: "10% at booking, 90% on possession",
        min_stages: 2,
        max_stages: 2,
        stages: TEN_NINETY_STAGES,
    },
    PlanTemplate {
        key: "DownPayment",
        name: "Down Payment Plan",
        description: "Bulk of the price paid upfront, usually against a discount",
        min_stages: 2,
        max_stages: 5,
        stages: DOWN_PAYMENT_STAGES,
    },
    PlanTemplate {
        key: "Flexi-30:70",
        name: "Flexi Plan 30:70",
        description: "30% within 60 days of booking, 70% on possession",
        min_stages: 2,
        max_stages: 10,
        stages: FLEXI_30_70_STAGES,
    },
    PlanTemplate {
        key: "Flexi-50:50",
        name: "Flexi Plan 50:50",
        description: "50% within 3 months of booking, 50% on possession",
        min_stages: 2,
        max_stages: 10,
        stages: FLEXI_50_50_STAGES,
    },
    PlanTemplate {
        key: "TimeLinked",
        name: "Time Linked Plan",
        description: "Equal payments every 6 months regardless of construction progress",
        min_stages: 2,
        max_stages: 12,
        stages: TIME_LINKED_STAGES,
    },
    PlanTemplate {
        key: "standard",
        name: "Standard Payment Plan",
        description: "Typical builder plan with GST on the first two installments",
        min_stages: 2,
        max_stages: 12,
        stages: STANDARD_STAGES,
    },
    PlanTemplate {
        key: "construction-linked",
        name: "Construction Linked Plan (with GST)",
        description: "Milestone plan over 30 months with GST on structural stages",
        min_stages: 3,
        max_stages: 20,
        stages: CONSTRUCTION_LINKED_STAGES,
    },
    PlanTemplate {
        key: "possession-linked",
        name: "Possession Linked Plan (20:80)",
        description: "20% at booking with GST, 80% on possession",
        min_stages: 2,
        max_stages: 2,
        stages: POSSESSION_LINKED_STAGES,
    },
];
