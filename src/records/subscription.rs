//! Patient subscriptions to a plan
//!
//! Unlike orders, suspended and expired subscriptions can be reactivated.

use crate::core::transition::{TransitionTable, Workflow};
use chrono::{DateTime, Utc};

crate::status_enum!(
    SubscriptionStatus,
    "subscription status",
    {
        Active => ("active", "Active", "check-circle", Success),
        Paused => ("paused", "Paused", "pause-circle", Secondary),
        Suspended => ("suspended", "Suspended", "alert-octagon", Warning),
        Expired => ("expired", "Expired", "calendar-x", Outline),
        Cancelled => ("cancelled", "Cancelled", "x-circle", Destructive),
    }
);

crate::impl_record!(
    Subscription,
    "subscription",
    "subscriptions",
    SubscriptionStatus,
    search: [patient_name, patient_email, plan_name],
    {
        patient_name: String,
        patient_email: String,
        plan_name: String,
        /// "monthly", "quarterly" or "annual"
        billing_cycle: String,
        amount: f64,
        next_billing_date: Option<DateTime<Utc>>,
    }
);

impl Workflow for Subscription {
    fn default_transitions() -> TransitionTable<SubscriptionStatus> {
        use SubscriptionStatus::*;
        TransitionTable::new()
            .allow(Active, [Paused, Suspended, Expired, Cancelled])
            .allow(Paused, [Active, Cancelled])
            .allow(Suspended, [Active])
            .allow(Expired, [Active])
    }

    fn terminal_statuses() -> &'static [SubscriptionStatus] {
        &[SubscriptionStatus::Cancelled]
    }
}
