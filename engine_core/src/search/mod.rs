pub mod engine;
pub mod highlight;
pub mod query;
pub mod tokenizer;

pub use engine::SearchEngine;
pub use highlight::Highlighter;
pub use query::{SearchMode, SearchOptions, SearchResult, SearchResultItem};
pub use tokenizer::{query_terms, tokenize, TokenSpan};
