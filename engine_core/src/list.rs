//! Filtered, ordered and paginated record listing

use crate::config::PaginationConfig;
use crate::error::Result;
use crate::filter::{apply_filters, FilterCondition};
use crate::models::Record;
use crate::pagination::{
    paginate, paginate_by_cursor, sort_by_field, CursorPage, OrderDirection, Page, PageRequest,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Key field used for cursors when `cursorField` is not given.
pub const DEFAULT_CURSOR_FIELD: &str = "id";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    #[serde(default)]
    pub filters: Vec<FilterCondition>,

    #[serde(default)]
    pub order_by: Option<String>,

    #[serde(default)]
    pub order_direction: OrderDirection,

    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[serde(default)]
    pub page: Option<usize>,

    #[validate(range(min = 1, message = "Per page must be at least 1"))]
    #[serde(default)]
    pub per_page: Option<usize>,

    #[serde(default)]
    pub cursor: Option<String>,

    #[serde(default)]
    pub cursor_field: Option<String>,

    #[validate(range(min = 1, message = "Limit must be at least 1"))]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filters(mut self, filters: Vec<FilterCondition>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_order(mut self, field: &str, direction: OrderDirection) -> Self {
        self.order_by = Some(field.to_string());
        self.order_direction = direction;
        self
    }

    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    /// Switches to cursor pagination, resuming after `cursor` when given.
    pub fn with_cursor(mut self, cursor: Option<&str>, limit: usize) -> Self {
        self.cursor = cursor.map(String::from);
        self.limit = Some(limit);
        if self.cursor_field.is_none() && self.cursor.is_none() {
            self.cursor_field = Some(self.key_field().to_string());
        }
        self
    }

    pub fn with_cursor_field(mut self, field: &str) -> Self {
        self.cursor_field = Some(field.to_string());
        self
    }

    pub fn uses_cursor(&self) -> bool {
        self.cursor.is_some() || self.cursor_field.is_some()
    }

    /// Field whose value identifies a record in a cursor. Never the ordering
    /// field, whose values repeat.
    pub fn key_field(&self) -> &str {
        self.cursor_field.as_deref().unwrap_or(DEFAULT_CURSOR_FIELD)
    }
}

/// A listing page, shaped by the pagination style that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ListResult {
    Cursor(CursorPage<Record>),
    Offset(Page<Record>),
}

impl ListResult {
    pub fn items(&self) -> &[Record] {
        match self {
            ListResult::Cursor(page) => &page.items,
            ListResult::Offset(page) => &page.items,
        }
    }

    pub fn next_cursor(&self) -> Option<&str> {
        match self {
            ListResult::Cursor(page) => page.next_cursor.as_deref(),
            ListResult::Offset(_) => None,
        }
    }
}

/// Filters, orders and paginates `records`.
///
/// Cursor pagination is used when `cursor` or `cursorField` is set, offset
/// pagination otherwise. Fails only on an undecodable cursor.
pub fn list_records(records: &[Record], options: &ListOptions, config: &PaginationConfig) -> Result<ListResult> {
    let mut rows: Vec<&Record> = apply_filters(records, &options.filters);

    if let Some(field) = options.order_by.as_deref() {
        sort_by_field(&mut rows, field, options.order_direction, |record| *record);
    }

    let rows: Vec<Record> = rows.into_iter().cloned().collect();

    if options.uses_cursor() {
        let key_field = options.key_field();
        let limit = options.limit.unwrap_or(config.default_per_page);
        debug!("Listing {} records by cursor on '{}'", rows.len(), key_field);

        let page = paginate_by_cursor(
            rows,
            |record| record.get(key_field).cloned(),
            options.cursor.as_deref(),
            limit,
        )?;
        return Ok(ListResult::Cursor(page));
    }

    let request = PageRequest::new(
        options.page.unwrap_or(1),
        options.per_page.unwrap_or(config.default_per_page),
    );
    debug!("Listing {} records, page {}", rows.len(), request.page);

    Ok(ListResult::Offset(paginate(rows, &request)))
}
