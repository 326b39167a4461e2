//! Grouped aggregation over in-memory records

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::aggregate::options::ALL_FIELDS;
use crate::aggregate::{
    AggregateField, AggregateGroup, AggregateOperation, AggregateOptions, AggregateResult,
    AggregateValues, HavingClause, HavingComparator,
};
use crate::filter::apply_filters;
use crate::models::{OrderedMap, Record, Value};
use crate::pagination::slice_window;

/// Key part used for a missing or null group-by value.
const NULL_KEY: &str = "null";

/// Computes one aggregation over a set of records.
type Reducer = fn(&[&Record], &str) -> Option<f64>;

impl AggregateOperation {
    fn reducer(self) -> Reducer {
        match self {
            AggregateOperation::Count => count,
            AggregateOperation::CountDistinct => count_distinct,
            AggregateOperation::Sum => sum,
            AggregateOperation::Avg => avg,
            AggregateOperation::Min => min,
            AggregateOperation::Max => max,
        }
    }
}

impl HavingComparator {
    fn comparison(self) -> fn(f64, f64) -> bool {
        match self {
            HavingComparator::Eq => |value: f64, threshold: f64| value == threshold,
            HavingComparator::Ne => |value: f64, threshold: f64| value != threshold,
            HavingComparator::Gt => |value: f64, threshold: f64| value > threshold,
            HavingComparator::Gte => |value: f64, threshold: f64| value >= threshold,
            HavingComparator::Lt => |value: f64, threshold: f64| value < threshold,
            HavingComparator::Lte => |value: f64, threshold: f64| value <= threshold,
        }
    }
}

/// Runs an aggregation request over `records`.
///
/// Records are first narrowed by `options.filters`. Without `group_by` a
/// single set of values is produced. With it, records are partitioned by the
/// group key in first-seen order, every group is aggregated on its own, then
/// HAVING, ordering and the offset/limit window are applied. `total_groups`
/// counts the groups that survived HAVING, before the window.
pub fn aggregate(records: &[Record], options: &AggregateOptions) -> AggregateResult {
    debug!("Executing aggregation: {:?}", options);

    let filtered = apply_filters(records, &options.filters);

    if !options.is_grouped() {
        let values = compute_values(&filtered, &options.aggregations);
        return AggregateResult::Ungrouped { values };
    }

    let mut groups: Vec<AggregateGroup> = partition(&filtered, &options.group_by)
        .into_iter()
        .map(|partition| AggregateGroup {
            values: compute_values(&partition.records, &options.aggregations),
            key: partition.key,
        })
        .filter(|group| passes_having(&group.values, &options.having))
        .collect();

    let total_groups = groups.len();
    order_groups(&mut groups, options);

    let groups = slice_window(groups, options.offset.unwrap_or(0), options.limit);
    debug!("Aggregation produced {} of {} groups", groups.len(), total_groups);

    AggregateResult::Grouped {
        groups,
        total_groups,
    }
}

/// Every requested aggregation over `records`, keyed by alias in request order.
pub fn compute_values(records: &[&Record], aggregations: &[AggregateField]) -> AggregateValues {
    aggregations
        .iter()
        .map(|aggregation| {
            let reducer = aggregation.operation.reducer();
            (aggregation.alias(), reducer(records, &aggregation.field))
        })
        .collect()
}

/// A group passes when every comparator under every alias holds. A null or
/// missing aggregate value never fails a comparator.
pub fn passes_having(values: &AggregateValues, having: &HavingClause) -> bool {
    having.iter().all(|(alias, conditions)| {
        match values.get(alias).copied().flatten() {
            None => true,
            Some(value) => conditions
                .iter()
                .all(|(comparator, threshold)| comparator.comparison()(value, *threshold)),
        }
    })
}

struct Partition<'a> {
    key: OrderedMap<Value>,
    records: Vec<&'a Record>,
}

fn group_key_part(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NULL_KEY.to_string(),
        Some(value) => value.to_string(),
    }
}

fn partition<'a>(records: &[&'a Record], group_by: &[String]) -> Vec<Partition<'a>> {
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut partitions: Vec<Partition<'a>> = Vec::new();

    for &record in records {
        let tuple: Vec<String> = group_by
            .iter()
            .map(|field| group_key_part(record.get(field)))
            .collect();

        match index.get(&tuple) {
            Some(&position) => partitions[position].records.push(record),
            None => {
                index.insert(tuple, partitions.len());
                let key = group_by
                    .iter()
                    .map(|field| (field.clone(), record.get(field).cloned().unwrap_or(Value::Null)))
                    .collect();
                partitions.push(Partition {
                    key,
                    records: vec![record],
                });
            }
        }
    }

    partitions
}

fn order_groups(groups: &mut [AggregateGroup], options: &AggregateOptions) {
    let Some(order_by) = options.order_by.as_deref() else {
        return;
    };
    let direction = options.order_direction;

    if options.aggregations.iter().any(|a| a.alias() == order_by) {
        groups.sort_by(|a, b| {
            let left = a.values.get(order_by).copied().flatten();
            let right = b.values.get(order_by).copied().flatten();
            direction.apply(compare_aggregate(left, right))
        });
    } else if options.group_by.iter().any(|field| field == order_by) {
        groups.sort_by(|a, b| {
            let left = group_key_part(a.key.get(order_by));
            let right = group_key_part(b.key.get(order_by));
            direction.apply(left.cmp(&right))
        });
    } else {
        debug!("Ignoring unknown aggregation order field '{}'", order_by);
    }
}

/// Nulls order before every number.
fn compare_aggregate(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn numbers<'a>(records: &'a [&'a Record], field: &'a str) -> impl Iterator<Item = f64> + 'a {
    records
        .iter()
        .filter_map(move |record| record.get(field).and_then(Value::as_number))
}

fn count(records: &[&Record], field: &str) -> Option<f64> {
    if field == ALL_FIELDS {
        return Some(records.len() as f64);
    }

    let present = records
        .iter()
        .filter(|record| record.get(field).map_or(false, |value| !value.is_null()))
        .count();
    Some(present as f64)
}

fn count_distinct(records: &[&Record], field: &str) -> Option<f64> {
    let distinct: HashSet<String> = records
        .iter()
        .filter_map(|record| record.get(field))
        .filter(|value| !value.is_null())
        .map(|value| value.to_string())
        .collect();
    Some(distinct.len() as f64)
}

fn sum(records: &[&Record], field: &str) -> Option<f64> {
    Some(numbers(records, field).sum())
}

fn avg(records: &[&Record], field: &str) -> Option<f64> {
    let (total, n) = numbers(records, field).fold((0.0, 0usize), |(total, n), value| (total + value, n + 1));
    if n == 0 {
        None
    } else {
        Some(total / n as f64)
    }
}

fn min(records: &[&Record], field: &str) -> Option<f64> {
    numbers(records, field).reduce(f64::min)
}

fn max(records: &[&Record], field: &str) -> Option<f64> {
    numbers(records, field).reduce(f64::max)
}
