//! Subscription plans offered to patients; the only deletable domain

use crate::core::transition::{TransitionTable, Workflow};

crate::status_enum!(
    PlanStatus,
    "plan status",
    {
        Draft => ("draft", "Draft", "file-pen", Outline),
        Active => ("active", "Active", "check-circle", Success),
        Inactive => ("inactive", "Inactive", "pause-circle", Secondary),
    }
);

crate::impl_record!(
    SubscriptionPlan,
    "subscription-plan",
    "subscription-plans",
    PlanStatus,
    search: [name, description],
    deletable: true,
    {
        name: String,
        description: Option<String>,
        price: f64,
        billing_cycle: String,
    }
);

impl Workflow for SubscriptionPlan {
    fn default_transitions() -> TransitionTable<PlanStatus> {
        use PlanStatus::*;
        TransitionTable::new()
            .allow(Draft, [Active])
            .allow(Active, [Inactive])
            .allow(Inactive, [Active])
    }
}
