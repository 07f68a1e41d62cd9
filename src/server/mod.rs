//! HTTP server exposing every registered collection
//!
//! `ServerBuilder` registers, for each record domain:
//! - a list route with search, categorical filters, sorting and pagination
//! - single record, transitions and status change routes
//! - a delete route (answers 405 for domains that do not allow deletion)

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::{ChangeStatusRequest, CollectionState, ListResponse, TransitionsResponse};
pub use router::build_collection_routes;
