//! Exhaustive checks of the built-in transition tables
//!
//! Every (from, to) pair of every domain is applied to a fresh record:
//! allowed pairs must move the status and bump `updated_at`, all other
//! pairs must fail and leave the record untouched.

use carepanel::core::transition::apply_transition_at;
use carepanel::prelude::*;
use std::fmt::Debug;

fn check_all_pairs<R>(make: impl Fn(R::Status) -> R)
where
    R: Workflow + PartialEq + Debug,
{
    let table = R::default_transitions();
    let mut allowed_pairs = 0;

    for &from in R::Status::all() {
        for &to in R::Status::all() {
            let record = make(from);
            let before = record.clone();

            // A clock that has not moved still has to produce a later stamp
            match apply_transition_at(&record, to, &table, before.updated_at()) {
                Ok(updated) => {
                    assert!(
                        table.is_allowed(from, to),
                        "{}: {from} -> {to} applied without an edge",
                        R::resource_name()
                    );
                    assert_eq!(updated.status(), to);
                    assert_eq!(updated.id(), before.id());
                    assert!(updated.updated_at() > before.updated_at());
                    assert_eq!(updated.created_at(), before.created_at());
                    allowed_pairs += 1;
                }
                Err(TransitionError::Invalid { .. }) => {
                    assert!(
                        !table.is_allowed(from, to),
                        "{}: {from} -> {to} rejected despite an edge",
                        R::resource_name()
                    );
                }
                Err(other) => panic!("{}: unexpected error {other}", R::resource_name()),
            }

            assert_eq!(record, before, "{}: input record was mutated", R::resource_name());
        }
    }

    assert!(allowed_pairs > 0, "{} has no transitions at all", R::resource_name());

    for &terminal in R::terminal_statuses() {
        assert!(
            table.is_terminal(terminal),
            "{}: {terminal} should be terminal",
            R::resource_name()
        );
    }
}

#[test]
fn test_order_pairs() {
    check_all_pairs(|status| {
        Order::new(
            "1",
            status,
            "ORD-1".to_string(),
            "Sarah Johnson".to_string(),
            "sarah@example.com".to_string(),
            Some("Dr. Lee".to_string()),
            "Protein Blend".to_string(),
            2,
            59.98,
        )
    });
}

#[test]
fn test_product_pairs() {
    check_all_pairs(|status| {
        Product::new(
            "1",
            status,
            "Protein Blend".to_string(),
            "PB-001".to_string(),
            "supplements".to_string(),
            29.99,
            40,
        )
    });
}

#[test]
fn test_subscription_pairs() {
    check_all_pairs(|status| {
        Subscription::new(
            "1",
            status,
            "Sarah Johnson".to_string(),
            "sarah@example.com".to_string(),
            "Starter".to_string(),
            "monthly".to_string(),
            49.0,
            None,
        )
    });
}

#[test]
fn test_plan_pairs() {
    check_all_pairs(|status| {
        SubscriptionPlan::new("1", status, "Starter".to_string(), None, 49.0, "monthly".to_string())
    });
}

#[test]
fn test_intake_pairs() {
    check_all_pairs(|status| {
        Intake::new(
            "1",
            status,
            "Sarah Johnson".to_string(),
            "sarah@example.com".to_string(),
            "Health history".to_string(),
            None,
            Utc::now(),
        )
    });
}

#[test]
fn test_patient_pairs() {
    check_all_pairs(|status| {
        Patient::new(
            "1",
            status,
            "Sarah Johnson".to_string(),
            "sarah@example.com".to_string(),
            None,
            Some("Dr. Lee".to_string()),
            Some("Weight management".to_string()),
        )
    });
}
