//! Record domains of the coaching dashboard
//!
//! Every domain declares its status enum (with badge table), its record
//! struct and its default transition table.

pub mod intake;
pub mod macros;
pub mod order;
pub mod patient;
pub mod product;
pub mod subscription;
pub mod subscription_plan;

pub use intake::{Intake, IntakeStatus};
pub use order::{Order, OrderStatus};
pub use patient::{Patient, PatientStatus};
pub use product::{Product, ProductStatus};
pub use subscription::{Subscription, SubscriptionStatus};
pub use subscription_plan::{PlanStatus, SubscriptionPlan};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial contents for every collection, loaded from JSON
///
/// Missing keys yield empty collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub subscriptions: Vec<Subscription>,
    pub subscription_plans: Vec<SubscriptionPlan>,
    pub intakes: Vec<Intake>,
    pub patients: Vec<Patient>,
}

impl SeedData {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("parsing seed file {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_missing_keys_are_empty() {
        let seed = SeedData::from_json_str(
            r#"{
                "patients": [{
                    "id": "p-1",
                    "status": "active",
                    "name": "Mike Chen",
                    "email": "mike@example.com",
                    "created_at": "2024-01-10T09:00:00Z",
                    "updated_at": "2024-01-12T09:00:00Z"
                }]
            }"#,
        )
        .unwrap();

        assert!(seed.orders.is_empty());
        assert_eq!(seed.patients.len(), 1);
        assert_eq!(seed.patients[0].status, PatientStatus::Active);
        assert!(seed.patients[0].phone.is_none());
    }

    #[test]
    fn test_seed_rejects_unknown_status() {
        let result = SeedData::from_json_str(
            r#"{
                "products": [{
                    "id": "sku-1",
                    "status": "all",
                    "name": "Omega 3",
                    "sku": "OM3",
                    "category": "supplements",
                    "price": 19.5,
                    "stock": 3,
                    "created_at": "2024-01-10T09:00:00Z",
                    "updated_at": "2024-01-10T09:00:00Z"
                }]
            }"#,
        );
        assert!(result.is_err());
    }
}
