//! Free-text search and categorical filters over records

use crate::core::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Constraint on a single categorical field
///
/// The dashboard's "all" dropdown entry maps to [`CategoricalFilter::Unfiltered`],
/// so a real status literally named "all" can never be confused with it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum CategoricalFilter {
    #[default]
    Unfiltered,
    Exact(String),
}

impl CategoricalFilter {
    pub fn exact(value: impl Into<String>) -> Self {
        CategoricalFilter::Exact(value.into())
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CategoricalFilter::Exact(_))
    }
}

/// Search term plus categorical filters, combined with AND
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,

    /// Field name -> constraint
    #[serde(default)]
    pub filters: BTreeMap<String, CategoricalFilter>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, filter: CategoricalFilter) -> Self {
        self.filters.insert(field.into(), filter);
        self
    }

    /// True when no predicate constrains the collection
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && !self.filters.values().any(CategoricalFilter::is_active)
    }
}

/// Whether `record` satisfies every predicate of `state`.
///
/// Search: the trimmed, lowercased term must be a substring of at least one
/// searchable field; an empty term matches everything and absent optional
/// fields simply do not match. Filters: `Exact` requires equality with the
/// field's string form; an unknown field never matches.
pub fn matches<R: Record>(record: &R, state: &FilterState) -> bool {
    matches_search(record, &state.search) && matches_filters(record, &state.filters)
}

fn matches_search<R: Record>(record: &R, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    R::searchable_fields().iter().any(|field| {
        record
            .field_value(field)
            .is_some_and(|value| value.contains_lowercase(&needle))
    })
}

fn matches_filters<R: Record>(record: &R, filters: &BTreeMap<String, CategoricalFilter>) -> bool {
    filters.iter().all(|(field, filter)| match filter {
        CategoricalFilter::Unfiltered => true,
        CategoricalFilter::Exact(expected) => record
            .field_value(field)
            .and_then(|value| value.to_filter_string())
            .is_some_and(|actual| &actual == expected),
    })
}

/// Keep the records of `items` that satisfy `state`, preserving order
pub fn filter_records<'a, R: Record>(items: &'a [R], state: &FilterState) -> Vec<&'a R> {
    items.iter().filter(|record| matches(*record, state)).collect()
}
