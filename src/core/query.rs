//! Query parameters, sorting and pagination utilities

use crate::core::error::ValidationError;
use crate::core::filter::{CategoricalFilter, FilterState};
use crate::core::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Field and direction used to order a filtered collection
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse `field`, `field:asc` or `field:desc`
    pub fn parse(expr: &str) -> Option<Self> {
        let (field, direction) = match expr.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some(_) => return None,
            None => (expr, SortDirection::Asc),
        };
        let field = field.trim();
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }

    /// Order two records by this sort key. Missing fields sort last.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        let ordering = match (a.field_value(&self.field), b.field_value(&self.field)) {
            (Some(x), Some(y)) => x.sort_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Stable sort of borrowed records; `None` keeps collection order
pub fn sort_records<R: Record>(records: &mut [&R], sort: Option<&SortSpec>) {
    if let Some(spec) = sort {
        records.sort_by(|a, b| spec.compare(*a, *b));
    }
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    pub effective_page: usize,
}

/// Total number of pages for `total` items, never less than 1
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Slice `items` into the requested page.
///
/// Out-of-range page numbers are clamped to `[1, total_pages]` rather than
/// rejected, and a page size of zero is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let effective_page = page.clamp(1, total_pages);

    let start = ((effective_page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        total_pages,
        effective_page,
    }
}

/// Session-scoped page position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Request a page; clamped against `filtered_count`
    pub fn set_page(&mut self, page: usize, filtered_count: usize) {
        self.current_page = page;
        self.clamp(filtered_count);
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Pull the current page back into range after the filtered count changed
    pub fn clamp(&mut self, filtered_count: usize) {
        let last = total_pages(filtered_count, self.page_size);
        self.current_page = self.current_page.clamp(1, last);
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages (at least 1)
    pub total_pages: usize,

    pub has_next: bool,

    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata; `page` is clamped like [`paginate`] does
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(total, page_size);
        let page = page.clamp(1, total_pages);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Query parameters for listing a collection over HTTP
///
/// # Example
/// ```text
/// GET /orders?page=2&page_size=10
/// GET /orders?q=sarah&status=pending
/// GET /orders?sort=total_amount:desc&coach_name=Dr.%20Lee
/// ```
///
/// Any key other than `q`, `page`, `page_size` and `sort` is an exact
/// categorical filter. A filter that is not present is unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<SortSpec>,
    pub filter: FilterState,
}

impl ListParams {
    /// Parse raw query pairs
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut params = ListParams::default();

        for (key, value) in query {
            match key.as_str() {
                "page" => params.page = Some(parse_positive(key, value)?),
                "page_size" => params.page_size = Some(parse_positive(key, value)?),
                "q" => params.filter.search = value.clone(),
                "sort" => {
                    let spec = SortSpec::parse(value).ok_or_else(|| ValidationError::InvalidQuery {
                        param: key.clone(),
                        message: format!("expected 'field', 'field:asc' or 'field:desc', got '{value}'"),
                    })?;
                    params.sort = Some(spec);
                }
                _ => {
                    params
                        .filter
                        .filters
                        .insert(key.clone(), CategoricalFilter::Exact(value.clone()));
                }
            }
        }

        Ok(params)
    }

    /// Page number, defaulting to 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// Page size clamped to `[1, max]`, defaulting to `default`
    pub fn page_size(&self, default: usize, max: usize) -> usize {
        self.page_size.unwrap_or(default).clamp(1, max.max(1))
    }
}

fn parse_positive(param: &str, value: &str) -> Result<usize, ValidationError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidQuery {
            param: param.to_string(),
            message: format!("expected a positive integer, got '{value}'"),
        }),
    }
}
