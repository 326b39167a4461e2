use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Record, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    /// Applies the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "asc"),
            OrderDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Ascending comparison of two field values.
///
/// Absent and null sort first. Two numbers compare numerically, two dates
/// chronologically, anything else by stringified form.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Some(Value::Date(x)), Some(Value::Date(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// Stable sort of `items` by one record field.
pub fn sort_by_field<T, F>(items: &mut [T], field: &str, direction: OrderDirection, record_of: F)
where
    F: Fn(&T) -> &Record,
{
    items.sort_by(|a, b| {
        let ordering = compare_values(record_of(a).get(field), record_of(b).get(field));
        direction.apply(ordering)
    });
}
