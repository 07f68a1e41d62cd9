//! Filterable, sortable, paginated view over a collection with a status workflow
//!
//! [`CollectionView`] is the one generic replacement for the per-page table
//! logic of the dashboard. It owns a [`CollectionStore`], the domain's
//! [`TransitionTable`] and the session state (filters, sort, page), reacts to
//! inbound UI events and derives a render-ready [`ViewModel`] on demand.
//!
//! Read path: store → filter/search → sort → paginate → view model.
//! Write path: status request → transition applier → (persister) → store.

use crate::core::error::CollectionError;
use crate::core::error::TransitionError;
use crate::core::filter::{CategoricalFilter, FilterState, matches};
use crate::core::query::{PageState, PaginationMeta, SortSpec, paginate, sort_records};
use crate::core::record::Record;
use crate::core::service::{RecordPersister, persist_checked};
use crate::core::status::StatusBadge;
use crate::core::store::CollectionStore;
use crate::core::transition::{TransitionTable, apply_transition};
use serde::Serialize;
use std::sync::Arc;

/// One visible row: the record plus what a table needs to render it
#[derive(Debug, Clone, Serialize)]
pub struct ViewRow<R: Record + Serialize> {
    #[serde(flatten)]
    pub record: R,

    pub badge: StatusBadge,

    /// Statuses the row's action menu may offer
    pub available_transitions: Vec<R::Status>,
}

/// Outbound model recomputed after every state change
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel<R: Record + Serialize> {
    pub visible_records: Vec<ViewRow<R>>,
    pub total_filtered_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
}

impl<R: Record + Serialize> ViewModel<R> {
    pub fn pagination(&self) -> PaginationMeta {
        PaginationMeta::new(self.current_page, self.page_size, self.total_filtered_count)
    }
}

/// Derive a view model from records and query state.
///
/// Shared by [`CollectionView`] and the HTTP handlers, which have no
/// session of their own.
pub fn project<R: Record + Serialize>(
    records: &[R],
    filter: &FilterState,
    sort: Option<&SortSpec>,
    page: usize,
    page_size: usize,
    transitions: &TransitionTable<R::Status>,
) -> ViewModel<R> {
    let mut filtered: Vec<&R> = records.iter().filter(|r| matches(*r, filter)).collect();
    sort_records(&mut filtered, sort);

    let page = paginate(&filtered, page, page_size);

    ViewModel {
        visible_records: page
            .items
            .into_iter()
            .map(|record| ViewRow {
                record: record.clone(),
                badge: StatusBadge::of(record.status()),
                available_transitions: transitions.allowed_from(record.status()),
            })
            .collect(),
        total_filtered_count: filtered.len(),
        current_page: page.effective_page,
        total_pages: page.total_pages,
        page_size: page_size.max(1),
    }
}

/// Session-scoped collection view
pub struct CollectionView<R: Record> {
    store: CollectionStore<R>,
    transitions: Arc<TransitionTable<R::Status>>,
    filter: FilterState,
    sort: Option<SortSpec>,
    page: PageState,
}

impl<R: Record + Serialize> CollectionView<R> {
    pub fn new(
        store: CollectionStore<R>,
        transitions: Arc<TransitionTable<R::Status>>,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            transitions,
            filter: FilterState::default(),
            sort: None,
            page: PageState::new(page_size),
        }
    }

    pub fn store(&self) -> &CollectionStore<R> {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn transitions(&self) -> &TransitionTable<R::Status> {
        &self.transitions
    }

    /// Number of records passing the current filter state
    pub fn filtered_count(&self) -> usize {
        self.store
            .all()
            .iter()
            .filter(|r| matches(*r, &self.filter))
            .count()
    }

    // === Inbound events ===

    pub fn on_filter_change(&mut self, filter: FilterState) {
        self.filter = filter;
        self.reclamp();
    }

    pub fn on_search_change(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        self.reclamp();
    }

    pub fn on_categorical_filter_change(
        &mut self,
        field: impl Into<String>,
        filter: CategoricalFilter,
    ) {
        self.filter.filters.insert(field.into(), filter);
        self.reclamp();
    }

    /// Sorting never changes the count, so the page stays put
    pub fn on_sort_change(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    pub fn on_page_change(&mut self, page: usize) {
        let count = self.filtered_count();
        self.page.set_page(page, count);
    }

    pub fn on_page_size_change(&mut self, page_size: usize) {
        self.page.set_page_size(page_size);
    }

    /// Validate and apply a status change in memory.
    ///
    /// `Ok(None)` when the id no longer exists (a stale row after a delete).
    pub fn on_status_change_requested(
        &mut self,
        id: &str,
        status: R::Status,
    ) -> Result<Option<R>, TransitionError> {
        let result = self.store.transition(id, status, &self.transitions);
        match &result {
            Ok(Some(record)) => tracing::debug!(
                resource = R::resource_name(),
                id,
                status = %record.status(),
                "status changed"
            ),
            Err(e) => tracing::warn!(resource = R::resource_name(), id, error = %e, "status change rejected"),
            Ok(None) => {}
        }
        self.reclamp();
        result
    }

    /// Validate locally, hand the new value to `persister`, then store what
    /// it returns. A persister failure, or an answer with another id or
    /// status, leaves the store untouched.
    pub async fn on_status_change_persisted(
        &mut self,
        id: &str,
        status: R::Status,
        persister: &dyn RecordPersister<R>,
    ) -> Result<Option<R>, CollectionError> {
        let Some(current) = self.store.get(id) else {
            tracing::debug!(resource = R::resource_name(), id, "status change on unknown id ignored");
            return Ok(None);
        };

        let candidate = apply_transition(current, status, &self.transitions)?;
        let persisted = persist_checked(persister, candidate).await?;

        let stored = persisted.clone();
        self.store.replace(id, move |_| stored);
        self.reclamp();
        Ok(Some(persisted))
    }

    /// Remove a record; unknown ids are a no-op
    pub fn on_delete(&mut self, id: &str) -> Result<Option<R>, CollectionError> {
        if !R::allows_delete() {
            return Err(CollectionError::DeleteNotSupported {
                resource: R::resource_name().to_string(),
            });
        }
        let removed = self.store.remove(id);
        if removed.is_some() {
            tracing::debug!(resource = R::resource_name(), id, "record deleted");
        }
        self.reclamp();
        Ok(removed)
    }

    // === Outbound ===

    pub fn view_model(&self) -> ViewModel<R> {
        project(
            self.store.all(),
            &self.filter,
            self.sort.as_ref(),
            self.page.current_page(),
            self.page.page_size(),
            &self.transitions,
        )
    }

    fn reclamp(&mut self) {
        let count = self.filtered_count();
        self.page.clamp(count);
    }
}
