pub mod engine;
pub mod options;

pub use engine::{aggregate, compute_values, passes_having};
pub use options::{
    AggregateField, AggregateGroup, AggregateOperation, AggregateOptions, AggregateResult,
    AggregateValues, HavingClause, HavingComparator, ALL_FIELDS,
};
