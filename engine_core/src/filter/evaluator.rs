//! Evaluation of filter conditions against records

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::filter::{FilterCondition, FilterOperator};
use crate::models::{stringify_json, Record, Value};

/// Evaluates one operator: the record's field value (absent is `None`) against
/// the condition operand.
pub type Predicate = fn(Option<&Value>, &JsonValue) -> bool;

impl FilterOperator {
    /// The predicate implementing this operator.
    pub fn predicate(&self) -> Predicate {
        match self {
            FilterOperator::Eq => equals,
            FilterOperator::Ne => not_equals,
            FilterOperator::Gt => greater_than,
            FilterOperator::Gte => greater_or_equal,
            FilterOperator::Lt => less_than,
            FilterOperator::Lte => less_or_equal,
            FilterOperator::In => member_of,
            FilterOperator::Nin => not_member_of,
            FilterOperator::Like => like,
            FilterOperator::ILike => ilike,
            FilterOperator::Null => null_check,
            FilterOperator::Between => between,
            FilterOperator::Unrecognized(_) => match_all,
        }
    }
}

/// Whether `record` satisfies `condition`. Never fails: operands that cannot
/// be compared make the predicate false, and unrecognized operators match.
pub fn evaluate(record: &Record, condition: &FilterCondition) -> bool {
    let predicate = condition.operator.predicate();
    predicate(record.get(&condition.field), &condition.value)
}

/// AND over all conditions. An empty slice matches everything.
pub fn evaluate_all(record: &Record, conditions: &[FilterCondition]) -> bool {
    conditions.iter().all(|condition| evaluate(record, condition))
}

/// Records passing every condition, in input order.
pub fn apply_filters<'a>(records: &'a [Record], conditions: &[FilterCondition]) -> Vec<&'a Record> {
    for condition in conditions.iter().filter(|c| !c.operator.is_recognized()) {
        warn!(
            field = %condition.field,
            operator = %condition.operator,
            "unrecognized filter operator matches every record"
        );
    }

    let matched: Vec<&Record> = records
        .iter()
        .filter(|record| evaluate_all(record, conditions))
        .collect();

    debug!("Filters kept {} of {} records", matched.len(), records.len());
    matched
}

fn equals(field: Option<&Value>, operand: &JsonValue) -> bool {
    field.map_or(false, |value| value.to_string() == stringify_json(operand))
}

fn not_equals(field: Option<&Value>, operand: &JsonValue) -> bool {
    !equals(field, operand)
}

fn numeric_pair(field: Option<&Value>, operand: &JsonValue) -> Option<(f64, f64)> {
    let left = field?.coerce_number()?;
    let right = Value::from_json(operand).coerce_number()?;
    Some((left, right))
}

fn greater_than(field: Option<&Value>, operand: &JsonValue) -> bool {
    numeric_pair(field, operand).map_or(false, |(a, b)| a > b)
}

fn greater_or_equal(field: Option<&Value>, operand: &JsonValue) -> bool {
    numeric_pair(field, operand).map_or(false, |(a, b)| a >= b)
}

fn less_than(field: Option<&Value>, operand: &JsonValue) -> bool {
    numeric_pair(field, operand).map_or(false, |(a, b)| a < b)
}

fn less_or_equal(field: Option<&Value>, operand: &JsonValue) -> bool {
    numeric_pair(field, operand).map_or(false, |(a, b)| a <= b)
}

fn member_of(field: Option<&Value>, operand: &JsonValue) -> bool {
    let Some(value) = field else {
        return false;
    };
    let needle = value.to_string();

    match operand {
        JsonValue::Array(candidates) => candidates.iter().any(|c| stringify_json(c) == needle),
        single => stringify_json(single) == needle,
    }
}

fn not_member_of(field: Option<&Value>, operand: &JsonValue) -> bool {
    !member_of(field, operand)
}

fn pattern_text(operand: &JsonValue) -> String {
    stringify_json(operand).replace('%', "")
}

fn like(field: Option<&Value>, operand: &JsonValue) -> bool {
    match field {
        None | Some(Value::Null) => false,
        Some(value) => value.to_string().contains(&pattern_text(operand)),
    }
}

fn ilike(field: Option<&Value>, operand: &JsonValue) -> bool {
    match field {
        None | Some(Value::Null) => false,
        Some(value) => value
            .to_string()
            .to_lowercase()
            .contains(&pattern_text(operand).to_lowercase()),
    }
}

fn is_truthy(operand: &JsonValue) -> bool {
    match operand {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn null_check(field: Option<&Value>, operand: &JsonValue) -> bool {
    let is_missing = field.map_or(true, Value::is_null);
    if is_truthy(operand) {
        is_missing
    } else {
        !is_missing
    }
}

fn between(field: Option<&Value>, operand: &JsonValue) -> bool {
    let bounds = match operand.as_array() {
        Some(bounds) if bounds.len() == 2 => bounds,
        _ => return false,
    };

    let min = Value::from_json(&bounds[0]).coerce_number();
    let max = Value::from_json(&bounds[1]).coerce_number();
    let value = field.and_then(Value::coerce_number);

    match (value, min, max) {
        (Some(value), Some(min), Some(max)) => value >= min && value <= max,
        _ => false,
    }
}

fn match_all(_field: Option<&Value>, _operand: &JsonValue) -> bool {
    true
}
