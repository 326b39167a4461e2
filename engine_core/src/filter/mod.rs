pub mod condition;
pub mod evaluator;

pub use condition::{FilterCondition, FilterOperator};
pub use evaluator::{apply_filters, evaluate, evaluate_all, Predicate};
