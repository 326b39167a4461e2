use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::{OrderedMap, Record};
use crate::pagination::{OrderDirection, PageMeta};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Any,
    All,
    Phrase,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Any => write!(f, "any"),
            SearchMode::All => write!(f, "all"),
            SearchMode::Phrase => write!(f, "phrase"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default)]
    #[validate(length(max = 1000, message = "Search query must not exceed 1000 characters"))]
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    #[serde(default)]
    pub mode: SearchMode,

    #[serde(default)]
    pub field_weights: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    #[serde(default)]
    pub order_direction: OrderDirection,

    #[serde(default)]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,

    #[serde(default)]
    #[validate(range(min = 1, message = "Per-page must be at least 1"))]
    pub per_page: Option<usize>,

    #[serde(default = "default_highlight")]
    pub highlight: bool,
}

fn default_highlight() -> bool {
    true
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            fields: None,
            mode: SearchMode::Any,
            field_weights: BTreeMap::new(),
            order_by: None,
            order_direction: OrderDirection::Asc,
            page: None,
            per_page: None,
            highlight: true,
        }
    }
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_fields(mut self, fields: Vec<&str>) -> Self {
        self.fields = Some(fields.into_iter().map(String::from).collect());
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_field_weight(mut self, field: &str, weight: f64) -> Self {
        self.field_weights.insert(field.to_string(), weight);
        self
    }

    pub fn with_order(mut self, field: &str, direction: OrderDirection) -> Self {
        self.order_by = Some(field.to_string());
        self.order_direction = direction;
        self
    }

    pub fn with_pagination(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn without_highlights(mut self) -> Self {
        self.highlight = false;
        self
    }

    /// Weight applied to a field's score; 1.0 unless configured.
    pub fn weight_of(&self, field: &str) -> f64 {
        self.field_weights.get(field).copied().unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub item: Record,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<OrderedMap<Vec<String>>>,
}

impl SearchResultItem {
    pub fn new(item: Record, score: f64) -> Self {
        Self {
            item,
            score,
            highlights: None,
        }
    }

    pub fn with_highlights(mut self, highlights: OrderedMap<Vec<String>>) -> Self {
        self.highlights = (!highlights.is_empty()).then_some(highlights);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<SearchResultItem>,
    #[serde(flatten)]
    pub pagination: PageMeta,
}

impl SearchResult {
    /// Matches after filtering and mode matching, before pagination.
    pub fn total_count(&self) -> usize {
        self.pagination.total_count
    }
}
