//! Patients managed by coaches

use crate::core::transition::{TransitionTable, Workflow};

crate::status_enum!(
    PatientStatus,
    "patient status",
    {
        Onboarding => ("onboarding", "Onboarding", "user-plus", Warning),
        Active => ("active", "Active", "user-check", Success),
        Inactive => ("inactive", "Inactive", "user-x", Secondary),
    }
);

crate::impl_record!(
    Patient,
    "patient",
    "patients",
    PatientStatus,
    search: [name, email, phone],
    {
        name: String,
        email: String,
        phone: Option<String>,
        coach_name: Option<String>,
        program: Option<String>,
    }
);

impl Workflow for Patient {
    fn default_transitions() -> TransitionTable<PatientStatus> {
        use PatientStatus::*;
        TransitionTable::new()
            .allow(Onboarding, [Active, Inactive])
            .allow(Active, [Inactive])
            .allow(Inactive, [Active])
    }
}
