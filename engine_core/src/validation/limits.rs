//! Allow-lists and maxima that options are validated against

use crate::config::{AggregationConfig, SearchConfig};
use serde::Deserialize;

/// Per-collection aggregation allow-lists.
///
/// An operation whose allow-list is empty accepts no fields. `countable_fields`
/// is only enforced when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregateLimits {
    pub sum_fields: Vec<String>,
    pub avg_fields: Vec<String>,
    pub min_max_fields: Vec<String>,
    pub count_distinct_fields: Vec<String>,
    pub group_by_fields: Vec<String>,
    pub countable_fields: Option<Vec<String>>,
    pub max_limit: usize,
}

fn owned(fields: Vec<&str>) -> Vec<String> {
    fields.into_iter().map(String::from).collect()
}

impl AggregateLimits {
    pub fn from_config(config: &AggregationConfig) -> Self {
        Self {
            sum_fields: Vec::new(),
            avg_fields: Vec::new(),
            min_max_fields: Vec::new(),
            count_distinct_fields: Vec::new(),
            group_by_fields: Vec::new(),
            countable_fields: None,
            max_limit: config.max_limit,
        }
    }

    /// Allows `fields` for sum, avg, min and max.
    pub fn with_numeric_fields(mut self, fields: Vec<&str>) -> Self {
        let fields = owned(fields);
        self.sum_fields = fields.clone();
        self.avg_fields = fields.clone();
        self.min_max_fields = fields;
        self
    }

    pub fn with_sum_fields(mut self, fields: Vec<&str>) -> Self {
        self.sum_fields = owned(fields);
        self
    }

    pub fn with_avg_fields(mut self, fields: Vec<&str>) -> Self {
        self.avg_fields = owned(fields);
        self
    }

    pub fn with_min_max_fields(mut self, fields: Vec<&str>) -> Self {
        self.min_max_fields = owned(fields);
        self
    }

    pub fn with_count_distinct_fields(mut self, fields: Vec<&str>) -> Self {
        self.count_distinct_fields = owned(fields);
        self
    }

    pub fn with_group_by_fields(mut self, fields: Vec<&str>) -> Self {
        self.group_by_fields = owned(fields);
        self
    }

    pub fn with_countable_fields(mut self, fields: Vec<&str>) -> Self {
        self.countable_fields = Some(owned(fields));
        self
    }

    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit;
        self
    }
}

impl Default for AggregateLimits {
    fn default() -> Self {
        Self::from_config(&AggregationConfig::default())
    }
}

/// Search allow-list and page size ceiling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchLimits {
    pub searchable_fields: Option<Vec<String>>,
    pub max_per_page: usize,
}

impl SearchLimits {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            searchable_fields: None,
            max_per_page: config.max_per_page,
        }
    }

    pub fn with_searchable_fields(mut self, fields: Vec<&str>) -> Self {
        self.searchable_fields = Some(owned(fields));
        self
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}
