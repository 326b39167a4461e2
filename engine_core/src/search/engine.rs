use tracing::debug;

use crate::config::SearchConfig;
use crate::filter::{apply_filters, FilterCondition};
use crate::models::{field_text, OrderedMap, Record, Value};
use crate::pagination::{paginate, sort_by_field, PageRequest};
use crate::search::highlight::Highlighter;
use crate::search::tokenizer::{find_case_insensitive, query_terms, token_spans, tokenize};
use crate::search::{SearchMode, SearchOptions, SearchResult, SearchResultItem};

/// Relevance-ranked search over an in-memory record collection.
///
/// Holds configuration only; every call is a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: SearchConfig,
    highlighter: Highlighter,
}

/// Query as prepared once per search call.
struct PreparedQuery<'a> {
    options: &'a SearchOptions,
    terms: Vec<String>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        let highlighter = Highlighter::from_config(&config);
        Self { config, highlighter }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Filters, matches, scores, orders and paginates `records`.
    ///
    /// A record is returned when it passes every filter and satisfies the
    /// search mode. Results are ordered by descending score with ties kept in
    /// input order, unless `order_by` is set.
    pub fn search(
        &self,
        records: &[Record],
        options: &SearchOptions,
        filters: &[FilterCondition],
    ) -> SearchResult {
        debug!("Executing search query: {:?}", options);

        let prepared = PreparedQuery {
            options,
            terms: query_terms(&options.query),
        };

        let mut matches: Vec<SearchResultItem> = apply_filters(records, filters)
            .into_iter()
            .filter_map(|record| self.match_record(record, &prepared))
            .collect();

        match options.order_by.as_deref() {
            Some(field) => sort_by_field(&mut matches, field, options.order_direction, |m| &m.item),
            None => matches.sort_by(|a, b| b.score.total_cmp(&a.score)),
        }

        let request = PageRequest::new(
            options.page.unwrap_or(1),
            options.per_page.unwrap_or(self.config.default_per_page),
        );
        let page = paginate(matches, &request);

        debug!(
            "Search '{}' ({}) matched {} records",
            options.query, options.mode, page.meta.total_count
        );

        SearchResult {
            items: page.items,
            pagination: page.meta,
        }
    }

    fn match_record(&self, record: &Record, query: &PreparedQuery<'_>) -> Option<SearchResultItem> {
        let fields = searched_fields(record, query.options.fields.as_deref());
        let texts: Vec<(&str, String)> = fields
            .iter()
            .filter_map(|field| field_text(record, field).map(|text| (field.as_str(), text)))
            .collect();

        let mut score = 0.0;
        let mut seen_terms = vec![false; query.terms.len()];

        for (field, text) in &texts {
            let tokens = tokenize(text);
            let mut hits = 0usize;
            for (i, term) in query.terms.iter().enumerate() {
                let occurrences = tokens.iter().filter(|token| *token == term).count();
                if occurrences > 0 {
                    seen_terms[i] = true;
                    hits += occurrences;
                }
            }
            score += hits as f64 * query.options.weight_of(field);
        }

        let matched = match query.options.mode {
            SearchMode::Any => score > 0.0,
            SearchMode::All => score > 0.0 && seen_terms.iter().all(|seen| *seen),
            SearchMode::Phrase => {
                query.options.query.is_empty()
                    || texts
                        .iter()
                        .any(|(_, text)| find_case_insensitive(text, &query.options.query).is_some())
            }
        };

        if !matched {
            return None;
        }

        let mut item = SearchResultItem::new(record.clone(), score);
        if query.options.highlight {
            item = item.with_highlights(self.highlights(&texts, query));
        }
        Some(item)
    }

    fn highlights(&self, texts: &[(&str, String)], query: &PreparedQuery<'_>) -> OrderedMap<Vec<String>> {
        let mut highlights = OrderedMap::new();

        for (field, text) in texts {
            let snippets = match query.options.mode {
                SearchMode::Phrase => self.phrase_snippets(text, &query.options.query),
                SearchMode::Any | SearchMode::All => self.term_snippets(text, &query.terms),
            };
            if !snippets.is_empty() {
                highlights.insert(*field, snippets);
            }
        }

        highlights
    }

    fn phrase_snippets(&self, text: &str, phrase: &str) -> Vec<String> {
        if phrase.is_empty() {
            return Vec::new();
        }
        find_case_insensitive(text, phrase)
            .map(|(start, end)| vec![self.highlighter.snippet(text, start, end)])
            .unwrap_or_default()
    }

    fn term_snippets(&self, text: &str, terms: &[String]) -> Vec<String> {
        let spans = token_spans(text);
        terms
            .iter()
            .filter_map(|term| spans.iter().find(|span| &span.term == term))
            .take(self.config.max_snippets_per_field)
            .map(|span| self.highlighter.snippet(text, span.start, span.end))
            .collect()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Fields searched for `record`: the requested ones, or every text field.
fn searched_fields(record: &Record, requested: Option<&[String]>) -> Vec<String> {
    match requested {
        Some(fields) => fields.to_vec(),
        None => record
            .iter()
            .filter(|(_, value)| matches!(value, Value::Text(_)))
            .map(|(field, _)| field.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::OrderDirection;
    use crate::record;

    fn shoes() -> Vec<Record> {
        vec![
            record! { "name" => "Red Shoes", "price" => 50 },
            record! { "name" => "Blue Shoes", "price" => 40 },
        ]
    }

    #[test]
    fn test_any_mode_single_term() {
        let engine = SearchEngine::default();
        let options = SearchOptions::new("red").with_fields(vec!["name"]);
        let result = engine.search(&shoes(), &options, &[]);

        assert_eq!(result.total_count(), 1);
        let hit = &result.items[0];
        assert_eq!(hit.item.get("name"), Some(&Value::from("Red Shoes")));
        assert!(hit.score > 0.0);
        let highlights = hit.highlights.as_ref().unwrap();
        assert_eq!(highlights.get("name").unwrap()[0], "<mark>Red</mark> Shoes");
    }

    #[test]
    fn test_score_counts_term_frequency_and_weights() {
        let records = vec![
            record! { "title" => "shoes", "body" => "shoes shoes" },
            record! { "title" => "boots", "body" => "shoes" },
        ];
        let engine = SearchEngine::default();
        let options = SearchOptions::new("shoes").with_field_weight("title", 2.0);
        let result = engine.search(&records, &options, &[]);

        assert_eq!(result.items[0].score, 4.0);
        assert_eq!(result.items[1].score, 1.0);
    }

    #[test]
    fn test_zero_weight_field_excludes_candidate() {
        let engine = SearchEngine::default();
        let options = SearchOptions::new("red").with_field_weight("name", 0.0);
        let result = engine.search(&shoes(), &options, &[]);
        assert_eq!(result.total_count(), 0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            record! { "id" => 1, "name" => "lamp" },
            record! { "id" => 2, "name" => "lamp lamp" },
            record! { "id" => 3, "name" => "lamp" },
        ];
        let engine = SearchEngine::default();
        let result = engine.search(&records, &SearchOptions::new("lamp"), &[]);
        let ids: Vec<String> = result.items.iter().map(|i| i.item.get("id").unwrap().to_string()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_explicit_order_overrides_score() {
        let engine = SearchEngine::default();
        let options = SearchOptions::new("shoes red").with_order("price", OrderDirection::Asc);
        let result = engine.search(&shoes(), &options, &[]);
        let prices: Vec<String> = result.items.iter().map(|i| i.item.get("price").unwrap().to_string()).collect();
        assert_eq!(prices, vec!["40", "50"]);
    }

    #[test]
    fn test_default_fields_are_text_fields() {
        let records = vec![record! { "name" => "Widget", "sku" => 12345 }];
        let engine = SearchEngine::default();
        assert_eq!(engine.search(&records, &SearchOptions::new("12345"), &[]).total_count(), 0);

        let options = SearchOptions::new("12345").with_fields(vec!["sku"]);
        assert_eq!(engine.search(&records, &options, &[]).total_count(), 1);
    }

    #[test]
    fn test_empty_query_matches_nothing_outside_phrase_mode() {
        let engine = SearchEngine::default();
        for mode in [SearchMode::Any, SearchMode::All] {
            let options = SearchOptions::new("  ").with_mode(mode);
            assert_eq!(engine.search(&shoes(), &options, &[]).total_count(), 0);
        }
    }

    #[test]
    fn test_filters_applied_before_matching() {
        let engine = SearchEngine::default();
        let filters = vec![FilterCondition::lt("price", 45)];
        let result = engine.search(&shoes(), &SearchOptions::new("shoes"), &filters);
        assert_eq!(result.total_count(), 1);
        assert_eq!(result.items[0].item.get("name"), Some(&Value::from("Blue Shoes")));
    }

    #[test]
    fn test_phrase_highlight() {
        let records = vec![record! { "description" => "Comfortable red shoes for running" }];
        let engine = SearchEngine::default();
        let options = SearchOptions::new("Red Shoes").with_mode(SearchMode::Phrase);
        let result = engine.search(&records, &options, &[]);

        assert_eq!(result.total_count(), 1);
        let snippet = &result.items[0].highlights.as_ref().unwrap().get("description").unwrap()[0];
        assert!(snippet.contains("<mark>red shoes</mark>"));
    }

    #[test]
    fn test_phrase_matches_same_case_greek_text() {
        let records = vec![record! { "street" => "ΟΔΟΣ" }];
        let engine = SearchEngine::default();
        let options = SearchOptions::new("ΟΔΟΣ").with_mode(SearchMode::Phrase);
        let result = engine.search(&records, &options, &[]);

        assert_eq!(result.total_count(), 1);
        let snippet = &result.items[0].highlights.as_ref().unwrap().get("street").unwrap()[0];
        assert_eq!(snippet, "<mark>ΟΔΟΣ</mark>");
    }

    #[test]
    fn test_snippets_per_field_capped() {
        let mut config = SearchConfig::default();
        config.max_snippets_per_field = 2;
        let engine = SearchEngine::new(config);
        let records = vec![record! { "text" => "alpha beta gamma delta" }];
        let result = engine.search(&records, &SearchOptions::new("delta alpha gamma"), &[]);

        let snippets = result.items[0].highlights.as_ref().unwrap().get("text").unwrap().clone();
        assert_eq!(snippets.len(), 2);
        assert!(snippets[0].contains("<mark>delta</mark>"));
        assert!(snippets[1].contains("<mark>alpha</mark>"));
    }

    #[test]
    fn test_highlights_disabled() {
        let engine = SearchEngine::default();
        let options = SearchOptions::new("red").without_highlights();
        let result = engine.search(&shoes(), &options, &[]);
        assert_eq!(result.total_count(), 1);
        assert!(result.items[0].highlights.is_none());
    }

    #[test]
    fn test_pagination_uses_default_per_page() {
        let mut config = SearchConfig::default();
        config.default_per_page = 2;
        let engine = SearchEngine::new(config);
        let records: Vec<Record> = (0..5).map(|i| record! { "id" => i, "name" => "lamp" }).collect();

        let result = engine.search(&records, &SearchOptions::new("lamp"), &[]);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.total_count(), 5);
        assert!(result.pagination.has_next_page);

        let last = engine.search(&records, &SearchOptions::new("lamp").with_pagination(3, 2), &[]);
        assert_eq!(last.items.len(), 1);
        assert!(!last.pagination.has_next_page);
        assert!(last.pagination.has_prev_page);
    }
}
