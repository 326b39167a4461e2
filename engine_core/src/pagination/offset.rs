use serde::{Deserialize, Serialize};
use validator::Validate;

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: usize,

    #[validate(range(min = 1, message = "Per-page must be at least 1"))]
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Zero-based index of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.per_page.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: usize,
    pub per_page: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Slices one page out of an already filtered and ordered sequence.
///
/// Page 0 and per-page 0 are treated as 1.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    let page = request.page.max(1);
    let per_page = request.per_page.max(1);
    let total_count = items.len();
    let total_pages = total_count.div_ceil(per_page);

    let items: Vec<T> = items
        .into_iter()
        .skip(request.offset())
        .take(per_page)
        .collect();

    Page {
        items,
        meta: PageMeta {
            page,
            per_page,
            total_count,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    }
}

/// The `[offset, offset + limit)` window of `items`. No limit means unbounded.
pub fn slice_window<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    items
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let page = paginate((1..=25).collect::<Vec<_>>(), &PageRequest::new(1, 10));
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.meta.total_count, 25);
        assert_eq!(page.meta.total_pages, 3);
        assert!(page.meta.has_next_page);
        assert!(!page.meta.has_prev_page);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((1..=25).collect::<Vec<_>>(), &PageRequest::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(!page.meta.has_next_page);
        assert!(page.meta.has_prev_page);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], &PageRequest::new(5, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_count, 3);
        assert!(!page.meta.has_next_page);
        assert!(page.meta.has_prev_page);
    }

    #[test]
    fn test_zero_page_treated_as_first() {
        let page = paginate(vec![1, 2, 3], &PageRequest::new(0, 2));
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.meta.page, 1);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(Vec::<i32>::new(), &PageRequest::new(1, 10));
        assert_eq!(page.meta.total_pages, 0);
        assert!(!page.meta.has_next_page);
    }

    #[test]
    fn test_slice_window() {
        assert_eq!(slice_window(vec![1, 2, 3, 4], 1, Some(2)), vec![2, 3]);
        assert_eq!(slice_window(vec![1, 2, 3, 4], 2, None), vec![3, 4]);
        assert!(slice_window(vec![1, 2], 5, None).is_empty());
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let page = paginate(vec![1], &PageRequest::new(1, 10));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert_eq!(json["perPage"], 10);
    }
}
