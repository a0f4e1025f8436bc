use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u64,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationMeta {
    pub fn new(current_page: u32, total_records: u64, limit: u32) -> Self {
        let current_page = current_page.max(1);
        let limit = limit.max(1);
        let total_pages = total_records.div_ceil(limit as u64);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);

        Self {
            current_page,
            total_pages,
            total_records,
            limit,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }

    /// An empty result still shows as "page 1 of 1".
    pub fn display_total_pages(&self) -> u32 {
        self.total_pages.max(1)
    }
}

impl Default for PaginationMeta {
    fn default() -> Self {
        PaginationMeta::new(1, 0, PAGE_SIZE)
    }
}

/// Cuts the 1-based page `current_page` out of `items`.
///
/// Out of range pages give an empty window rather than an error.
pub fn slice<T>(items: &[T], current_page: u32, page_size: u32) -> (&[T], PaginationMeta) {
    let meta = PaginationMeta::new(current_page, items.len() as u64, page_size);

    let start = (meta.current_page as usize - 1).saturating_mul(meta.limit as usize);
    if start >= items.len() {
        return (&items[..0], meta);
    }
    let end = start.saturating_add(meta.limit as usize).min(items.len());

    (&items[start..end], meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_many() {
        let items: Vec<u32> = (0..120).collect();
        let (window, meta) = slice(&items, 1, PAGE_SIZE);
        assert_eq!(window, &items[0..50]);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_records, 120);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn last_page_is_partial() {
        let items: Vec<u32> = (0..120).collect();
        let (window, meta) = slice(&items, 3, PAGE_SIZE);
        assert_eq!(window, &items[100..120]);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let items: Vec<u32> = (0..120).collect();
        for page in [4, 5, 1_000, u32::MAX] {
            let (window, meta) = slice(&items, page, PAGE_SIZE);
            assert!(window.is_empty());
            assert!(page > meta.total_pages);
        }
    }

    #[test]
    fn empty_input_has_no_pages() {
        let items: Vec<u32> = Vec::new();
        let (window, meta) = slice(&items, 1, PAGE_SIZE);
        assert!(window.is_empty());
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.display_total_pages(), 1);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn page_zero_is_first_page() {
        let items: Vec<u32> = (0..10).collect();
        let (window, meta) = slice(&items, 0, PAGE_SIZE);
        assert_eq!(window.len(), 10);
        assert_eq!(meta.current_page, 1);
    }

    #[test]
    fn window_never_exceeds_page_size() {
        for len in [0usize, 1, 49, 50, 51, 99, 100, 101, 257] {
            let items: Vec<usize> = (0..len).collect();
            let (_, meta) = slice(&items, 1, PAGE_SIZE);
            for page in 1..=meta.total_pages + 2 {
                let (window, _) = slice(&items, page, PAGE_SIZE);
                assert!(window.len() <= PAGE_SIZE as usize);
                if page > meta.total_pages {
                    assert!(window.is_empty());
                }
            }
        }
    }

    #[test]
    fn concatenated_pages_rebuild_input() {
        let items: Vec<usize> = (0..257).collect();
        let (_, meta) = slice(&items, 1, PAGE_SIZE);

        let mut rebuilt = Vec::new();
        for page in 1..=meta.total_pages {
            let (window, _) = slice(&items, page, PAGE_SIZE);
            rebuilt.extend_from_slice(window);
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(PaginationMeta::new(2, 120, 50)).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["totalRecords"], 120);
        assert_eq!(json["hasNextPage"], true);
        assert_eq!(json["hasPrevPage"], true);
    }
}
