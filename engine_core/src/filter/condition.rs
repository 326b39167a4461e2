//! Filter predicates as parsed from query input

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Comparison operator of a [`FilterCondition`].
///
/// Operator names that are not recognized are kept verbatim in
/// `Unrecognized` instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Like,
    ILike,
    Null,
    Between,
    Unrecognized(String),
}

impl FilterOperator {
    pub fn from_name(name: &str) -> Self {
        match name {
            "eq" => FilterOperator::Eq,
            "ne" => FilterOperator::Ne,
            "gt" => FilterOperator::Gt,
            "gte" => FilterOperator::Gte,
            "lt" => FilterOperator::Lt,
            "lte" => FilterOperator::Lte,
            "in" => FilterOperator::In,
            "nin" => FilterOperator::Nin,
            "like" => FilterOperator::Like,
            "ilike" => FilterOperator::ILike,
            "null" => FilterOperator::Null,
            "between" => FilterOperator::Between,
            other => FilterOperator::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
            FilterOperator::Nin => "nin",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
            FilterOperator::Null => "null",
            FilterOperator::Between => "between",
            FilterOperator::Unrecognized(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, FilterOperator::Unrecognized(_))
    }
}

impl From<String> for FilterOperator {
    fn from(name: String) -> Self {
        FilterOperator::from_name(&name)
    }
}

impl From<FilterOperator> for String {
    fn from(operator: FilterOperator) -> Self {
        operator.as_str().to_string()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single `{field, operator, value}` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: JsonValue,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: JsonValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Eq, value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Ne, value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Gt, value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Gte, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Lt, value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Lte, value.into())
    }

    pub fn in_list(field: impl Into<String>, values: Vec<JsonValue>) -> Self {
        Self::new(field, FilterOperator::In, JsonValue::Array(values))
    }

    pub fn not_in_list(field: impl Into<String>, values: Vec<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Nin, JsonValue::Array(values))
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, JsonValue::String(pattern.into()))
    }

    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::ILike, JsonValue::String(pattern.into()))
    }

    pub fn is_null(field: impl Into<String>, expect_null: bool) -> Self {
        Self::new(field, FilterOperator::Null, JsonValue::Bool(expect_null))
    }

    pub fn between(field: impl Into<String>, min: impl Into<JsonValue>, max: impl Into<JsonValue>) -> Self {
        Self::new(field, FilterOperator::Between, JsonValue::Array(vec![min.into(), max.into()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_names_round_trip() {
        for name in ["eq", "ne", "gt", "gte", "lt", "lte", "in", "nin", "like", "ilike", "null", "between"] {
            let operator = FilterOperator::from_name(name);
            assert!(operator.is_recognized(), "{} should be recognized", name);
            assert_eq!(operator.as_str(), name);
        }
    }

    #[test]
    fn test_unrecognized_operator_is_preserved() {
        let condition: FilterCondition =
            serde_json::from_value(json!({"field": "price", "operator": "regex", "value": "^a"})).unwrap();
        assert_eq!(condition.operator, FilterOperator::Unrecognized("regex".to_string()));
        assert!(!condition.operator.is_recognized());
        assert_eq!(serde_json::to_value(&condition).unwrap()["operator"], json!("regex"));
    }

    #[test]
    fn test_missing_value_defaults_to_null() {
        let condition: FilterCondition =
            serde_json::from_value(json!({"field": "deleted_at", "operator": "null"})).unwrap();
        assert_eq!(condition.operator, FilterOperator::Null);
        assert!(condition.value.is_null());
    }

    #[test]
    fn test_builders() {
        let condition = FilterCondition::between("price", 10, 20);
        assert_eq!(condition.operator, FilterOperator::Between);
        assert_eq!(condition.value, json!([10, 20]));

        let condition = FilterCondition::in_list("status", vec![json!("open"), json!("closed")]);
        assert_eq!(condition.operator, FilterOperator::In);
    }
}
