//! Intake form submissions awaiting coach review

use crate::core::transition::{TransitionTable, Workflow};
use chrono::{DateTime, Utc};

crate::status_enum!(
    IntakeStatus,
    "intake status",
    {
        Pending => ("pending", "Pending", "clock", Warning),
        InReview => ("in_review", "In review", "eye", Default),
        NeedsInfo => ("needs_info", "Needs info", "help-circle", Outline),
        Approved => ("approved", "Approved", "check-circle", Success),
        Rejected => ("rejected", "Rejected", "x-circle", Destructive),
    }
);

crate::impl_record!(
    Intake,
    "intake",
    "intakes",
    IntakeStatus,
    search: [patient_name, patient_email, form_name],
    {
        patient_name: String,
        patient_email: String,
        form_name: String,
        coach_name: Option<String>,
        submitted_at: DateTime<Utc>,
    }
);

impl Workflow for Intake {
    fn default_transitions() -> TransitionTable<IntakeStatus> {
        use IntakeStatus::*;
        TransitionTable::new()
            .allow(Pending, [InReview])
            .allow(InReview, [Approved, Rejected, NeedsInfo])
            .allow(NeedsInfo, [InReview])
    }

    fn terminal_statuses() -> &'static [IntakeStatus] {
        &[IntakeStatus::Approved, IntakeStatus::Rejected]
    }
}
