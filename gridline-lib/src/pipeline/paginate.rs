//! Paginate stage.

use std::ops::Range;

use serde::Serialize;

/// Page position over a sequence of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// 1-based page, always within `1..=total_pages`.
    pub current_page: usize,
    /// Never less than 1, even for an empty sequence.
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl PageMeta {
    /// Page metadata for `total_items` rows, clamping `requested_page` into range.
    pub fn new(total_items: usize, requested_page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(total_items, page_size);
        Self {
            current_page: clamp_page(requested_page, total_pages),
            total_pages,
            total_items,
            page_size,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Index range of this page within the full sequence.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// 1-based position of the first row on this page (0 when there are no rows).
    pub fn first_item(&self) -> usize {
        if self.total_items == 0 { 0 } else { self.range().start + 1 }
    }

    /// 1-based position of the last row on this page (0 when there are no rows).
    pub fn last_item(&self) -> usize {
        self.range().end
    }
}

/// `max(1, ceil(total_items / page_size))`.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page into `1..=total_pages`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice out one page of `rows`.
///
/// A page past the end resets to the last page, so a non-empty sequence never
/// yields an empty page.
///
/// # Example
///
/// ```
/// use gridline_lib::pipeline::paginate;
///
/// let rows: Vec<u32> = (1..=12).collect();
/// let (page, meta) = paginate(&rows, 9, 5);
/// assert_eq!(page, &[11, 12]);
/// assert_eq!(meta.current_page, 3);
/// assert_eq!(meta.total_pages, 3);
/// ```
pub fn paginate<T>(rows: &[T], current_page: usize, page_size: usize) -> (&[T], PageMeta) {
    let meta = PageMeta::new(rows.len(), current_page, page_size);
    (&rows[meta.range()], meta)
}
