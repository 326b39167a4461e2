//! In-memory query engine: filtering, aggregation, relevance search and
//! pagination over record collections already loaded by the caller.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod list;
pub mod models;
pub mod pagination;
pub mod search;
pub mod validation;

pub use aggregate::{aggregate, AggregateField, AggregateOperation, AggregateOptions, AggregateResult, HavingComparator};
pub use config::{AggregationConfig, EngineConfig, FilterConfig, PaginationConfig, SearchConfig};
pub use error::{QueryError, Result};
pub use filter::{apply_filters, evaluate, FilterCondition, FilterOperator};
pub use list::{list_records, ListOptions, ListResult};
pub use models::{OrderedMap, Record, Value};
pub use pagination::{decode_cursor, encode_cursor, paginate, paginate_by_cursor, CursorPage, OrderDirection, Page, PageMeta, PageRequest};
pub use search::{SearchEngine, SearchMode, SearchOptions, SearchResult, SearchResultItem};
pub use validation::{
    validate_aggregate_limit, validate_aggregate_options, validate_filters, validate_list_options, validate_search_options, AggregateLimits,
    SearchLimits, Validatable, ValidationResult,
};
