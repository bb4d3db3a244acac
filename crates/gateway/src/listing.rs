//! Paged product listings.
//!
//! Collaborators return up to one page plus at least one extra item. The extra
//! item is never shown; it only tells us another page exists.

/// One page of results and the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page index to request next; `None` on the last page.
    pub next_page: Option<u32>,
}

/// Truncate an over-fetched candidate list to `page_size` items.
///
/// `next_page` is `page_index + 1` only when the collaborator returned strictly
/// more than `page_size` items.
#[must_use]
pub fn paginate<T>(mut candidates: Vec<T>, page_index: u32, page_size: usize) -> Page<T> {
    let has_more = candidates.len() > page_size;
    candidates.truncate(page_size);

    Page {
        items: candidates,
        next_page: has_more.then(|| page_index.saturating_add(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_item_signals_next_page() {
        let page = paginate((1..=9).collect(), 0, 8);
        assert_eq!(page.items, (1..=8).collect::<Vec<_>>());
        assert_eq!(page.next_page, Some(1));
    }

    #[test]
    fn test_exact_page_is_last() {
        let page = paginate((1..=8).collect(), 0, 8);
        assert_eq!(page.items.len(), 8);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_one_past_page_size_boundary() {
        let page = paginate(vec!['a', 'b', 'c', 'd'], 4, 3);
        assert_eq!(page.items, vec!['a', 'b', 'c']);
        assert_eq!(page.next_page, Some(5));
    }

    #[test]
    fn test_short_and_empty_pages() {
        let page = paginate(vec![1, 2], 2, 6);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.next_page, None);

        let empty: Page<i32> = paginate(Vec::new(), 0, 6);
        assert!(empty.items.is_empty());
        assert_eq!(empty.next_page, None);
    }

    #[test]
    fn test_next_page_saturates() {
        let page = paginate(vec![1, 2], u32::MAX, 1);
        assert_eq!(page.next_page, Some(u32::MAX));
    }
}
