//! # Carepanel
//!
//! Record collections with a status workflow for a health-coaching dashboard.
//!
//! ## Features
//!
//! - **One generic collection view**: search, categorical filters, sorting and pagination
//!   shared by orders, products, subscriptions, plans, intakes and patients
//! - **Status workflows as data**: each domain ships a transition table that YAML
//!   configuration may override
//! - **Badge lookup tables**: every status maps to a label, icon and badge variant
//! - **Macro-based domains**: `status_enum!` and `impl_record!` generate the boilerplate
//! - **REST exposure**: axum routes per collection, with events on every mutation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use carepanel::prelude::*;
//!
//! let store = CollectionStore::from_records(seed.orders)?;
//! let mut view = CollectionView::new(store, Arc::new(Order::default_transitions()), 10);
//!
//! view.on_search_change("sarah");
//! view.on_status_change_requested("ORD-1", OrderStatus::Confirmed)?;
//!
//! let model = view.view_model();
//! ```

pub mod config;
pub mod core;
pub mod records;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BadgeVariant, CareError, CareResult, CategoricalFilter, CollectionError, CollectionStore,
        CollectionView, EventBus, FieldValue, FilterState, Record, RecordEvent, RecordPersister,
        SortDirection, SortSpec, Status, StatusBadge, TransitionError, TransitionTable, ViewModel,
        Workflow, apply_transition,
    };

    // === Macros ===
    pub use crate::{impl_record, status_enum};

    // === Domains ===
    pub use crate::records::{
        Intake, IntakeStatus, Order, OrderStatus, Patient, PatientStatus, PlanStatus, Product,
        ProductStatus, SeedData, Subscription, SubscriptionPlan, SubscriptionStatus,
    };

    // === Storage ===
    pub use crate::storage::InMemoryPersister;

    // === Config ===
    pub use crate::config::{CollectionConfig, PaginationConfig, WorkflowConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
