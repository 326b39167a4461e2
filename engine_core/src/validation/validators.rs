//! Validators for aggregation, search, filter and listing options

use super::{rules::*, AggregateLimits, SearchLimits, Validatable, ValidationResult};
use crate::aggregate::{AggregateOperation, AggregateOptions, ALL_FIELDS};
use crate::config::{AggregationConfig, FilterConfig, PaginationConfig};
use crate::error::Result;
use crate::filter::{FilterCondition, FilterOperator};
use crate::list::ListOptions;
use crate::search::SearchOptions;
use tracing::debug;

/// Checks aggregation options against per-collection allow-lists before any
/// computation runs.
pub fn validate_aggregate_options(options: &AggregateOptions, limits: &AggregateLimits) -> Result<()> {
    let mut result = check_aggregate_shape(options, limits.max_limit);

    for (i, aggregation) in options.aggregations.iter().enumerate() {
        let path = format!("aggregations[{}]", i);
        let field = aggregation.field.as_str();

        let allowed = match aggregation.operation {
            AggregateOperation::Sum => Some(&limits.sum_fields),
            AggregateOperation::Avg => Some(&limits.avg_fields),
            AggregateOperation::Min | AggregateOperation::Max => Some(&limits.min_max_fields),
            AggregateOperation::CountDistinct => Some(&limits.count_distinct_fields),
            AggregateOperation::Count if field == ALL_FIELDS => None,
            AggregateOperation::Count => limits.countable_fields.as_ref(),
        };

        if let Some(allowed) = allowed {
            if !disallowed_fields([field], allowed).is_empty() {
                result.add_error(
                    &path,
                    &format!("Field '{}' is not allowed for {}", field, aggregation.operation),
                );
            }
        }

        if let Some(alias) = &aggregation.alias {
            if let Err(e) = validate_field_name(alias) {
                result.add_error(&format!("{}.alias", path), &error_message(&e));
            }
        }
    }

    for field in disallowed_fields(options.group_by.iter().map(String::as_str), &limits.group_by_fields) {
        result.add_error("groupBy", &format!("Field '{}' is not groupable", field));
    }

    debug!("Aggregate options valid: {}", result.is_valid);
    result.into_result()
}

/// Checks aggregation options against the configured maximum `limit` only,
/// for callers without per-collection allow-lists.
pub fn validate_aggregate_limit(options: &AggregateOptions, config: &AggregationConfig) -> Result<()> {
    let result = check_aggregate_shape(options, config.max_limit);
    debug!("Aggregate limit valid: {}", result.is_valid);
    result.into_result()
}

fn check_aggregate_shape(options: &AggregateOptions, max_limit: usize) -> ValidationResult {
    let mut result = ValidationResult::success();

    if options.aggregations.is_empty() {
        result.add_error("aggregations", "At least one aggregation is required");
    }

    if let Some(limit) = options.limit {
        if limit > max_limit {
            result.add_error("limit", &format!("Limit must not exceed {}", max_limit));
        }
    }

    result.merge(check_filters(&options.filters, None));
    result
}

/// Checks search options: page bounds, searchable fields and weights.
pub fn validate_search_options(options: &SearchOptions, limits: &SearchLimits) -> Result<()> {
    let mut result = options.validate_comprehensive();

    if let Some(per_page) = options.per_page {
        if per_page > limits.max_per_page {
            result.add_error("perPage", &format!("Per page must not exceed {}", limits.max_per_page));
        }
    }

    if let (Some(fields), Some(allowed)) = (&options.fields, &limits.searchable_fields) {
        for field in disallowed_fields(fields.iter().map(String::as_str), allowed) {
            result.add_error("fields", &format!("Field '{}' is not searchable", field));
        }
    }

    for (field, weight) in &options.field_weights {
        if let Err(e) = validate_weight(*weight) {
            result.add_error(&format!("fieldWeights.{}", field), &error_message(&e));
        }
    }

    debug!("Search options valid: {}", result.is_valid);
    result.into_result()
}

/// Checks filter conditions. Field names are always checked; operator names
/// and operand shapes only when `reject_unknown_operators` is set.
pub fn validate_filters(conditions: &[FilterCondition], config: &FilterConfig) -> Result<()> {
    check_filters(conditions, Some(config)).into_result()
}

/// Checks listing options against the configured page size ceiling.
pub fn validate_list_options(options: &ListOptions, config: &PaginationConfig) -> Result<()> {
    let mut result = options.validate_comprehensive();

    if let Some(per_page) = options.per_page {
        if per_page > config.max_per_page {
            result.add_error("perPage", &format!("Per page must not exceed {}", config.max_per_page));
        }
    }

    if let Some(limit) = options.limit {
        if limit > config.max_per_page {
            result.add_error("limit", &format!("Limit must not exceed {}", config.max_per_page));
        }
    }

    result.merge(check_filters(&options.filters, None));
    result.into_result()
}

fn check_filters(conditions: &[FilterCondition], config: Option<&FilterConfig>) -> ValidationResult {
    let mut result = ValidationResult::success();
    let strict = config.map(|c| c.reject_unknown_operators).unwrap_or(false);

    for (i, condition) in conditions.iter().enumerate() {
        let path = format!("filters[{}]", i);

        if let Err(e) = validate_field_name(&condition.field) {
            result.add_error(&format!("{}.field", path), &error_message(&e));
        }

        if !strict {
            continue;
        }

        match &condition.operator {
            FilterOperator::Unrecognized(name) => {
                result.add_error(&format!("{}.operator", path), &format!("Unknown operator '{}'", name));
            }
            FilterOperator::In | FilterOperator::Nin if !condition.value.is_array() => {
                result.add_error(&format!("{}.value", path), "Operand must be an array");
            }
            FilterOperator::Between
                if condition.value.as_array().map(|bounds| bounds.len()) != Some(2) =>
            {
                result.add_error(&format!("{}.value", path), "Operand must be a [min, max] pair");
            }
            FilterOperator::Like | FilterOperator::ILike if !condition.value.is_string() => {
                result.add_error(&format!("{}.value", path), "Pattern must be a string");
            }
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateField;
    use crate::config::SearchConfig;
    use crate::error::QueryError;
    use serde_json::json;

    fn limits() -> AggregateLimits {
        AggregateLimits::from_config(&AggregationConfig::default())
            .with_numeric_fields(vec!["price", "qty"])
            .with_count_distinct_fields(vec!["sku"])
            .with_group_by_fields(vec!["category"])
    }

    fn summary(err: QueryError) -> String {
        err.validation().map(|v| v.summary()).unwrap_or_default()
    }

    #[test]
    fn test_valid_aggregate_options() {
        let options = AggregateOptions::new(vec![
            AggregateField::count_all(),
            AggregateField::sum("price"),
            AggregateField::count_distinct("sku"),
        ])
        .with_group_by(vec!["category"])
        .with_pagination(0, 1000);

        assert!(validate_aggregate_options(&options, &limits()).is_ok());
    }

    #[test]
    fn test_disallowed_aggregate_field() {
        let options = AggregateOptions::new(vec![AggregateField::avg("cost")]);
        let err = validate_aggregate_options(&options, &limits()).unwrap_err();
        assert_eq!(summary(err), "aggregations[0]: Field 'cost' is not allowed for avg");
    }

    #[test]
    fn test_disallowed_group_by_and_limit() {
        let options = AggregateOptions::new(vec![AggregateField::count_all()])
            .with_group_by(vec!["secret"])
            .with_pagination(0, 1001);
        let err = validate_aggregate_options(&options, &limits()).unwrap_err();
        assert_eq!(
            summary(err),
            "groupBy: Field 'secret' is not groupable; limit: Limit must not exceed 1000"
        );
    }

    #[test]
    fn test_empty_aggregations_rejected() {
        let options = AggregateOptions::new(vec![]);
        assert!(validate_aggregate_options(&options, &limits()).is_err());
    }

    #[test]
    fn test_configured_max_limit_enforced_without_allow_lists() {
        let config = AggregationConfig { max_limit: 50 };
        let within = AggregateOptions::new(vec![AggregateField::sum("anything")]).with_pagination(0, 50);
        assert!(validate_aggregate_limit(&within, &config).is_ok());

        let over = AggregateOptions::new(vec![AggregateField::sum("anything")]).with_pagination(0, 51);
        let err = validate_aggregate_limit(&over, &config).unwrap_err();
        assert_eq!(summary(err), "limit: Limit must not exceed 50");
    }

    #[test]
    fn test_countable_fields_only_when_configured() {
        let options = AggregateOptions::new(vec![AggregateField::count("email")]);
        assert!(validate_aggregate_options(&options, &limits()).is_ok());

        let restricted = limits().with_countable_fields(vec!["name"]);
        assert!(validate_aggregate_options(&options, &restricted).is_err());
    }

    #[test]
    fn test_search_options_limits() {
        let limits = SearchLimits::from_config(&SearchConfig::default()).with_searchable_fields(vec!["name"]);

        let ok = SearchOptions::new("shoes").with_fields(vec!["name"]).with_pagination(1, 100);
        assert!(validate_search_options(&ok, &limits).is_ok());

        let too_big = SearchOptions::new("shoes").with_pagination(1, 101);
        assert!(validate_search_options(&too_big, &limits).is_err());

        let bad_field = SearchOptions::new("shoes").with_fields(vec!["password"]);
        let err = validate_search_options(&bad_field, &limits).unwrap_err();
        assert_eq!(summary(err), "fields: Field 'password' is not searchable");

        let bad_weight = SearchOptions::new("shoes").with_field_weight("name", -1.0);
        assert!(validate_search_options(&bad_weight, &limits).is_err());
    }

    #[test]
    fn test_search_page_must_be_positive() {
        let options = SearchOptions::new("shoes").with_pagination(0, 10);
        let err = validate_search_options(&options, &SearchLimits::default()).unwrap_err();
        assert!(err.validation().unwrap().errors.contains_key("page"));
    }

    #[test]
    fn test_filters_permissive_by_default() {
        let conditions = vec![FilterCondition::new("price", FilterOperator::from_name("regex"), json!(".*"))];
        assert!(validate_filters(&conditions, &FilterConfig::default()).is_ok());
    }

    #[test]
    fn test_filters_strict_mode() {
        let config = FilterConfig {
            reject_unknown_operators: true,
        };
        let conditions = vec![
            FilterCondition::new("price", FilterOperator::from_name("regex"), json!(".*")),
            FilterCondition::new("qty", FilterOperator::In, json!(3)),
            FilterCondition::new("qty", FilterOperator::Between, json!([1])),
            FilterCondition::eq("qty", 3),
        ];
        let err = validate_filters(&conditions, &config).unwrap_err();
        let result = err.validation().unwrap();
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors.contains_key("filters[0].operator"));
        assert!(!result.errors.contains_key("filters[3].value"));
    }

    #[test]
    fn test_blank_filter_field_rejected() {
        let conditions = vec![FilterCondition::eq(" ", 1)];
        let err = validate_filters(&conditions, &FilterConfig::default()).unwrap_err();
        assert_eq!(summary(err), "filters[0].field: Field name contains invalid characters");
    }
}
