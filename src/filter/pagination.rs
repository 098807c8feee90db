//! Pagination controller
//!
//! Slices the filtered set into fixed-size pages and computes the bounded,
//! ellipsis-aware page-number window shown under the results.

use serde::Serialize;

/// Listings per page
pub const PAGE_SIZE: usize = 21;

/// Numbered buttons shown at once, not counting the pinned first/last pages
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Pages needed for `count` items; zero items means zero pages
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// The items on a 1-based page; page 0 or a page past the end is empty
pub fn page_slice<T>(items: &[T], current_page: usize) -> &[T] {
    if current_page == 0 {
        return &[];
    }
    let start = (current_page - 1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = current_page.saturating_mul(PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// One element of the page navigation, in render order
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageItem {
    Previous { disabled: bool },
    Page { number: usize, current: bool },
    Ellipsis,
    Next { disabled: bool },
}

/// Page-number window for a given position
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub current_page: usize,
    pub total_pages: usize,
    /// First numbered button of the window
    pub start: usize,
    /// Last numbered button of the window; below `start` when there are no pages
    pub end: usize,
}

impl PageWindow {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        let max_visible = MAX_VISIBLE_PAGES as isize;
        let current = current_page as isize;
        let total = total_pages as isize;

        let mut start = (current - max_visible / 2).max(1);
        let end = total.min(start + max_visible - 1);
        if end - start + 1 < max_visible {
            start = (end - max_visible + 1).max(1);
        }

        Self {
            current_page,
            total_pages,
            start: start as usize,
            end: end.max(0) as usize,
        }
    }

    /// Page 1 is pinned in front of the window
    pub fn shows_first_page(&self) -> bool {
        self.start > 1
    }

    pub fn leading_ellipsis(&self) -> bool {
        self.start > 2
    }

    /// The last page is pinned behind the window
    pub fn shows_last_page(&self) -> bool {
        self.end < self.total_pages
    }

    pub fn trailing_ellipsis(&self) -> bool {
        self.end + 1 < self.total_pages
    }

    pub fn prev_disabled(&self) -> bool {
        self.current_page == 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current_page == self.total_pages || self.total_pages == 0
    }

    pub fn contains(&self, page: usize) -> bool {
        self.start <= page && page <= self.end
    }

    pub fn items(&self) -> Vec<PageItem> {
        let mut items = vec![PageItem::Previous {
            disabled: self.prev_disabled(),
        }];

        if self.shows_first_page() {
            items.push(self.page(1));
            if self.leading_ellipsis() {
                items.push(PageItem::Ellipsis);
            }
        }

        for number in self.start..=self.end {
            items.push(self.page(number));
        }

        if self.shows_last_page() {
            if self.trailing_ellipsis() {
                items.push(PageItem::Ellipsis);
            }
            items.push(self.page(self.total_pages));
        }

        items.push(PageItem::Next {
            disabled: self.next_disabled(),
        });
        items
    }

    fn page(&self, number: usize) -> PageItem {
        PageItem::Page {
            number,
            current: number == self.current_page,
        }
    }
}
