//! Language-agnostic tokenizer: runs of letters and digits, lower-cased

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(r"[\p{L}\p{N}]+").unwrap();
}

/// A token and the byte range it occupies in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub term: String,
    pub start: usize,
    pub end: usize,
}

pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

pub fn token_spans(text: &str) -> Vec<TokenSpan> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| TokenSpan {
            term: m.as_str().to_lowercase(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Query tokens without duplicates, in first-seen order.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in tokenize(query) {
        if !terms.contains(&token) {
            terms.push(token);
        }
    }
    terms
}

/// Lower-cases `text` and records, for every byte of the result, the byte
/// offset of the source character it came from. The map has one extra entry
/// for the end of the text.
pub fn fold_case(text: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);

    for (position, ch) in text.char_indices() {
        for lower in ch.to_lowercase() {
            let before = folded.len();
            folded.push(lower);
            offsets.extend(std::iter::repeat(position).take(folded.len() - before));
        }
    }
    offsets.push(text.len());

    (folded, offsets)
}

/// Byte range in `text` of the first case-insensitive occurrence of `needle`.
pub fn find_case_insensitive(text: &str, needle: &str) -> Option<(usize, usize)> {
    let (folded_text, offsets) = fold_case(text);
    let (folded_needle, _) = fold_case(needle);
    let start = folded_text.find(&folded_needle)?;
    let end = start + folded_needle.len();
    Some((offsets[start], offsets[end]))
}
