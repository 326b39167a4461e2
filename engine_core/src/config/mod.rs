pub mod settings;

pub use settings::{AggregationConfig, EngineConfig, FilterConfig, PaginationConfig, SearchConfig};
