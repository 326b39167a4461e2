//! Highlighted snippets around search matches

use crate::config::SearchConfig;

const ELLIPSIS: &str = "…";

#[derive(Debug, Clone)]
pub struct Highlighter {
    pre: String,
    post: String,
    context_chars: usize,
}

impl Highlighter {
    pub fn new(pre: impl Into<String>, post: impl Into<String>, context_chars: usize) -> Self {
        Self {
            pre: pre.into(),
            post: post.into(),
            context_chars,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.highlight_pre.clone(),
            config.highlight_post.clone(),
            config.snippet_context_chars,
        )
    }

    /// Wraps `text[start..end]` in the markers, keeping up to `context_chars`
    /// characters on each side. Truncated sides get an ellipsis.
    ///
    /// `start` and `end` must be char boundaries of `text`.
    pub fn snippet(&self, text: &str, start: usize, end: usize) -> String {
        let window_start = self.context_start(text, start);
        let window_end = self.context_end(text, end);

        let mut snippet = String::with_capacity(window_end - window_start + self.pre.len() + self.post.len() + 6);
        if window_start > 0 {
            snippet.push_str(ELLIPSIS);
        }
        snippet.push_str(&text[window_start..start]);
        snippet.push_str(&self.pre);
        snippet.push_str(&text[start..end]);
        snippet.push_str(&self.post);
        snippet.push_str(&text[end..window_end]);
        if window_end < text.len() {
            snippet.push_str(ELLIPSIS);
        }
        snippet
    }

    fn context_start(&self, text: &str, start: usize) -> usize {
        if self.context_chars == 0 {
            return start;
        }
        text[..start]
            .char_indices()
            .rev()
            .nth(self.context_chars - 1)
            .map(|(position, _)| position)
            .unwrap_or(0)
    }

    fn context_end(&self, text: &str, end: usize) -> usize {
        text[end..]
            .char_indices()
            .nth(self.context_chars)
            .map(|(position, _)| end + position)
            .unwrap_or(text.len())
    }
}
