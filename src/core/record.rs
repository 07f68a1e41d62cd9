//! The record abstraction shared by every collection

use crate::core::field::FieldValue;
use crate::core::status::Status;
use chrono::{DateTime, Utc};

/// Base trait for all records held in a collection.
///
/// Every record has:
/// - id: opaque identifier, unique within its collection
/// - status: a member of the domain's closed [`Status`] enum
/// - created_at / updated_at: timestamps
///
/// Concrete record types are normally generated with
/// [`impl_record!`](crate::impl_record).
pub trait Record: Clone + Send + Sync + 'static {
    /// Status enum of this domain
    type Status: Status;

    /// The plural resource name used in URLs (e.g., "orders", "subscription-plans")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "order")
    fn resource_name_singular() -> &'static str;

    fn id(&self) -> &str;

    fn status(&self) -> Self::Status;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Shallow copy carrying a new status and `updated_at`.
    ///
    /// Must not change the id.
    fn with_status(&self, status: Self::Status, updated_at: DateTime<Utc>) -> Self;

    /// Fields consulted by free-text search
    fn searchable_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Whether records of this domain may be removed from their collection
    fn allows_delete() -> bool {
        false
    }
}
