//! Route table for one record collection

use super::handlers::{
    CollectionState, change_status, delete_record, get_record, get_transitions, list_records,
};
use crate::core::record::Record;
use crate::core::transition::Workflow;
use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

/// Build the routes of a collection under `/{resource}`
///
/// - GET    /{resource}                    - Filtered, sorted, paginated list
/// - GET    /{resource}/{id}               - Single record
/// - DELETE /{resource}/{id}               - Remove a record (deletable domains only)
/// - GET    /{resource}/{id}/transitions   - Current status and allowed targets
/// - POST   /{resource}/{id}/status        - Request a status change
pub fn build_collection_routes<R>(state: CollectionState<R>) -> Router
where
    R: Workflow + Serialize,
{
    let base = format!("/{}", R::resource_name());

    Router::new()
        .route(&base, get(list_records::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_record::<R>).delete(delete_record::<R>),
        )
        .route(
            &format!("{base}/{{id}}/transitions"),
            get(get_transitions::<R>),
        )
        .route(&format!("{base}/{{id}}/status"), post(change_status::<R>))
        .with_state(state)
}
