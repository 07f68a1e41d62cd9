//! HTTP handlers for record collections
//!
//! All handlers are generic over the record type; the router instantiates
//! them once per registered collection.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::error::{CareError, CareResult, CollectionError, LookupError};
use crate::core::events::{EventBus, RecordEvent};
use crate::core::query::{ListParams, PaginationMeta};
use crate::core::record::Record;
use crate::core::service::{RecordPersister, persist_checked};
use crate::core::status::{Status, StatusBadge};
use crate::core::store::CollectionStore;
use crate::core::transition::{TransitionTable, Workflow, apply_transition, parse_status};
use crate::core::view::{ViewModel, project};

/// State shared by the handlers of one collection
pub struct CollectionState<R: Workflow> {
    pub store: Arc<RwLock<CollectionStore<R>>>,
    pub transitions: Arc<TransitionTable<R::Status>>,
    /// Called after local validation, before the store is updated
    pub persister: Option<Arc<dyn RecordPersister<R>>>,
    pub event_bus: Option<EventBus>,
    pub page_size: usize,
    pub max_page_size: usize,
}

impl<R: Workflow> Clone for CollectionState<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            transitions: self.transitions.clone(),
            persister: self.persister.clone(),
            event_bus: self.event_bus.clone(),
            page_size: self.page_size,
            max_page_size: self.max_page_size,
        }
    }
}

impl<R: Workflow> CollectionState<R> {
    fn publish(&self, event: RecordEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}

/// Response for the list endpoint
#[derive(Debug, Serialize)]
pub struct ListResponse<R: Record + Serialize> {
    #[serde(flatten)]
    pub view: ViewModel<R>,
    pub pagination: PaginationMeta,
}

/// Response for the transitions endpoint
#[derive(Debug, Serialize)]
pub struct TransitionsResponse<S: Status> {
    pub id: String,
    pub status: S,
    pub badge: StatusBadge,
    pub allowed: Vec<S>,
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

fn not_found<R: Record>(id: &str) -> CareError {
    LookupError::NotFound {
        resource: R::resource_name().to_string(),
        id: id.to_string(),
    }
    .into()
}

/// `GET /{resource}`
pub async fn list_records<R>(
    State(state): State<CollectionState<R>>,
    Query(query): Query<HashMap<String, String>>,
) -> CareResult<Json<ListResponse<R>>>
where
    R: Workflow + Serialize,
{
    let params = ListParams::from_query(&query)?;
    let page_size = params.page_size(state.page_size, state.max_page_size);

    let store = state.store.read().await;
    let view = project(
        store.all(),
        &params.filter,
        params.sort.as_ref(),
        params.page(),
        page_size,
        &state.transitions,
    );
    let pagination = view.pagination();

    Ok(Json(ListResponse { view, pagination }))
}

/// `GET /{resource}/{id}`
pub async fn get_record<R>(
    State(state): State<CollectionState<R>>,
    Path(id): Path<String>,
) -> CareResult<Json<R>>
where
    R: Workflow + Serialize,
{
    let store = state.store.read().await;
    store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found::<R>(&id))
}

/// `GET /{resource}/{id}/transitions`
pub async fn get_transitions<R>(
    State(state): State<CollectionState<R>>,
    Path(id): Path<String>,
) -> CareResult<Json<TransitionsResponse<R::Status>>>
where
    R: Workflow + Serialize,
{
    let store = state.store.read().await;
    let record = store.get(&id).ok_or_else(|| not_found::<R>(&id))?;
    let status = record.status();

    Ok(Json(TransitionsResponse {
        id,
        status,
        badge: StatusBadge::of(status),
        allowed: state.transitions.allowed_from(status),
    }))
}

/// `POST /{resource}/{id}/status`
///
/// Validates against the transition table, lets the persister (if any) have
/// the final say, then replaces the stored record and publishes an event.
pub async fn change_status<R>(
    State(state): State<CollectionState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<ChangeStatusRequest>, JsonRejection>,
) -> CareResult<Json<R>>
where
    R: Workflow + Serialize,
{
    let Json(payload) = payload?;
    let requested = parse_status::<R>(&payload.status)?;

    let mut store = state.store.write().await;
    let current = store.get(&id).ok_or_else(|| not_found::<R>(&id))?;
    let from = current.status();

    let mut updated = apply_transition(current, requested, &state.transitions).inspect_err(|e| {
        tracing::warn!(resource = R::resource_name(), id = %id, error = %e, "status change rejected");
    })?;

    if let Some(persister) = &state.persister {
        updated = persist_checked(persister.as_ref(), updated).await?;
    }

    let stored = updated.clone();
    store.replace(&id, move |_| stored);
    drop(store);

    tracing::info!(
        resource = R::resource_name(),
        id = %id,
        from = %from,
        to = %updated.status(),
        "status changed"
    );
    state.publish(RecordEvent::StatusChanged {
        resource: R::resource_name().to_string(),
        id: id.clone(),
        from: from.as_str().to_string(),
        to: updated.status().as_str().to_string(),
    });

    Ok(Json(updated))
}

/// `DELETE /{resource}/{id}`
///
/// Idempotent: deleting an unknown id still answers 204.
pub async fn delete_record<R>(
    State(state): State<CollectionState<R>>,
    Path(id): Path<String>,
) -> CareResult<StatusCode>
where
    R: Workflow + Serialize,
{
    if !R::allows_delete() {
        return Err(CollectionError::DeleteNotSupported {
            resource: R::resource_name().to_string(),
        }
        .into());
    }

    let removed = state.store.write().await.remove(&id);
    if removed.is_some() {
        tracing::info!(resource = R::resource_name(), id = %id, "record deleted");
        state.publish(RecordEvent::Deleted {
            resource: R::resource_name().to_string(),
            id,
        });
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
