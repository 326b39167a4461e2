//! Aggregation requests and results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::filter::FilterCondition;
use crate::models::{OrderedMap, Value};
use crate::pagination::OrderDirection;

/// Field name that makes `count` count whole records.
pub const ALL_FIELDS: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregateOperation {
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOperation::Count => "count",
            AggregateOperation::CountDistinct => "countDistinct",
            AggregateOperation::Sum => "sum",
            AggregateOperation::Avg => "avg",
            AggregateOperation::Min => "min",
            AggregateOperation::Max => "max",
        }
    }
}

impl std::fmt::Display for AggregateOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateField {
    pub operation: AggregateOperation,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl AggregateField {
    pub fn new(operation: AggregateOperation, field: impl Into<String>) -> Self {
        Self {
            operation,
            field: field.into(),
            alias: None,
        }
    }

    pub fn count_all() -> Self {
        Self::new(AggregateOperation::Count, ALL_FIELDS)
    }

    pub fn count(field: impl Into<String>) -> Self {
        Self::new(AggregateOperation::Count, field)
    }

    pub fn count_distinct(field: impl Into<String>) -> Self {
        Self::new(AggregateOperation::CountDistinct, field)
    }

    pub fn sum(field: impl Into<String>) -> Self {
        Self::new(AggregateOperation::Sum, field)
    }

    pub fn avg(field: impl Into<String>) -> Self {
        Self::new(AggregateOperation::Avg, field)
    }

    pub fn min(field: impl Into<String>) -> Self {
        Self::new(AggregateOperation::Min, field)
    }

    pub fn max(field: impl Into<String>) -> Self {
        Self::new(AggregateOperation::Max, field)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Result key for this aggregation: the explicit alias, else the bare
    /// operation for `*`, else operation followed by the capitalized field
    /// (`sum` + `price` gives `sumPrice`).
    pub fn alias(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }

        if self.field == ALL_FIELDS {
            return self.operation.as_str().to_string();
        }

        let mut chars = self.field.chars();
        match chars.next() {
            Some(first) => format!(
                "{}{}{}",
                self.operation.as_str(),
                first.to_uppercase(),
                chars.as_str()
            ),
            None => self.operation.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HavingComparator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// alias -> comparator -> threshold
pub type HavingClause = BTreeMap<String, BTreeMap<HavingComparator, f64>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateOptions {
    pub aggregations: Vec<AggregateField>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub having: HavingClause,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub order_direction: OrderDirection,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
}

impl AggregateOptions {
    pub fn new(aggregations: Vec<AggregateField>) -> Self {
        Self {
            aggregations,
            ..Default::default()
        }
    }

    pub fn with_group_by(mut self, fields: Vec<&str>) -> Self {
        self.group_by = fields.into_iter().map(String::from).collect();
        self
    }

    pub fn with_having(mut self, alias: &str, comparator: HavingComparator, threshold: f64) -> Self {
        self.having
            .entry(alias.to_string())
            .or_default()
            .insert(comparator, threshold);
        self
    }

    pub fn with_order(mut self, order_by: &str, direction: OrderDirection) -> Self {
        self.order_by = Some(order_by.to_string());
        self.order_direction = direction;
        self
    }

    pub fn with_pagination(mut self, offset: usize, limit: usize) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterCondition>) -> Self {
        self.filters = filters;
        self
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }
}

/// alias -> computed value; `None` serializes as `null`.
pub type AggregateValues = OrderedMap<Option<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateGroup {
    pub key: OrderedMap<Value>,
    pub values: AggregateValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateResult {
    Grouped {
        groups: Vec<AggregateGroup>,
        #[serde(rename = "totalGroups")]
        total_groups: usize,
    },
    Ungrouped {
        values: AggregateValues,
    },
}

impl AggregateResult {
    pub fn values(&self) -> Option<&AggregateValues> {
        match self {
            AggregateResult::Ungrouped { values } => Some(values),
            AggregateResult::Grouped { .. } => None,
        }
    }

    pub fn groups(&self) -> Option<&[AggregateGroup]> {
        match self {
            AggregateResult::Grouped { groups, .. } => Some(groups),
            AggregateResult::Ungrouped { .. } => None,
        }
    }

    pub fn total_groups(&self) -> Option<usize> {
        match self {
            AggregateResult::Grouped { total_groups, .. } => Some(*total_groups),
            AggregateResult::Ungrouped { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alias_derivation() {
        assert_eq!(AggregateField::sum("price").alias(), "sumPrice");
        assert_eq!(AggregateField::avg("age").alias(), "avgAge");
        assert_eq!(AggregateField::count_distinct("category").alias(), "countDistinctCategory");
        assert_eq!(AggregateField::count_all().alias(), "count");
        assert_eq!(AggregateField::count("email").alias(), "countEmail");
        assert_eq!(AggregateField::max("unit_price").alias(), "maxUnit_price");
        assert_eq!(AggregateField::sum("price").with_alias("revenue").alias(), "revenue");
    }

    #[test]
    fn test_options_deserialize() {
        let options: AggregateOptions = serde_json::from_value(json!({
            "aggregations": [
                {"operation": "sum", "field": "price"},
                {"operation": "countDistinct", "field": "sku", "alias": "skus"}
            ],
            "groupBy": ["category"],
            "having": {"sumPrice": {"gte": 10, "lt": 100}},
            "orderBy": "sumPrice",
            "orderDirection": "desc",
            "limit": 5
        }))
        .unwrap();

        assert_eq!(options.aggregations.len(), 2);
        assert_eq!(options.aggregations[1].alias(), "skus");
        assert_eq!(options.group_by, vec!["category"]);
        assert_eq!(options.having["sumPrice"][&HavingComparator::Gte], 10.0);
        assert_eq!(options.having["sumPrice"][&HavingComparator::Lt], 100.0);
        assert_eq!(options.order_direction, OrderDirection::Desc);
        assert_eq!(options.limit, Some(5));
        assert!(options.offset.is_none());
        assert!(options.filters.is_empty());
    }

    #[test]
    fn test_unknown_having_comparator_rejected() {
        let parsed = serde_json::from_value::<AggregateOptions>(json!({
            "aggregations": [{"operation": "sum", "field": "price"}],
            "having": {"sumPrice": {"near": 10}}
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_result_serialization() {
        let mut values = AggregateValues::new();
        values.insert("sumPrice", Some(40.0));
        values.insert("avgPrice", None);
        let result = AggregateResult::Ungrouped { values };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"values": {"sumPrice": 40.0, "avgPrice": null}})
        );

        let grouped = AggregateResult::Grouped {
            groups: vec![],
            total_groups: 0,
        };
        assert_eq!(
            serde_json::to_value(&grouped).unwrap(),
            json!({"groups": [], "totalGroups": 0})
        );
    }
}
