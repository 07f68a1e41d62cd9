//! Core module containing the generic collection, filter and workflow types

pub mod error;
pub mod events;
pub mod field;
pub mod filter;
pub mod query;
pub mod record;
pub mod service;
pub mod status;
pub mod store;
pub mod transition;
pub mod view;

pub use error::{CareError, CareResult, CollectionError, ConfigError, TransitionError};
pub use events::{EventBus, EventEnvelope, RecordEvent};
pub use field::{FieldValue, IntoFieldValue};
pub use filter::{CategoricalFilter, FilterState};
pub use query::{ListParams, PageState, PaginationMeta, SortDirection, SortSpec};
pub use record::Record;
pub use service::RecordPersister;
pub use status::{BadgeVariant, Status, StatusBadge, StatusPresentation};
pub use store::CollectionStore;
pub use transition::{TransitionTable, Workflow, apply_transition};
pub use view::{CollectionView, ViewModel, ViewRow};
