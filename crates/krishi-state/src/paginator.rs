//! Fixed-size paging over an in-memory row set

use crate::{PAGE_WINDOW, ROWS_PER_PAGE};
use std::ops::Range;

/// One entry of the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Page { number: usize, active: bool },
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paginator<T> {
    rows: Vec<T>,
    current_page: usize,
    per_page: usize,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self::new(ROWS_PER_PAGE)
    }
}

impl<T> Paginator<T> {
    pub fn new(per_page: usize) -> Self {
        Self {
            rows: Vec::new(),
            current_page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Replace the row set and go back to page 1
    pub fn set_data(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.current_page = 1;
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.per_page)
    }

    /// Row indices shown on the current page
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.per_page).min(self.rows.len());
        let end = (start + self.per_page).min(self.rows.len());
        start..end
    }

    pub fn page(&self) -> &[T] {
        &self.rows[self.range()]
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.page_count()
    }

    /// Jump to `page`; out-of-range pages are ignored
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.page_count() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn prev(&mut self) -> bool {
        self.can_prev() && self.go_to(self.current_page - 1)
    }

    pub fn next(&mut self) -> bool {
        self.can_next() && self.go_to(self.current_page + 1)
    }

    /// Page-number strip: a window of up to five pages around the current
    /// one, plus the first and last pages separated by ellipses when needed.
    pub fn controls(&self) -> Vec<PageControl> {
        let total = self.page_count();
        if total == 0 {
            return Vec::new();
        }

        let span = PAGE_WINDOW - 1;
        let mut start = self.current_page.saturating_sub(2).max(1);
        let end = (start + span).min(total);
        if end - start < span {
            start = end.saturating_sub(span).max(1);
        }

        let page = |number| PageControl::Page {
            number,
            active: number == self.current_page,
        };
        let mut controls = Vec::with_capacity(PAGE_WINDOW + 4);

        if start > 1 {
            controls.push(page(1));
            if start > 2 {
                controls.push(PageControl::Ellipsis);
            }
        }

        controls.extend((start..=end).map(page));

        if end < total {
            if end < total - 1 {
                controls.push(PageControl::Ellipsis);
            }
            controls.push(page(total));
        }

        controls
    }

    /// (first shown, 1-based or 0 when empty; last shown; total)
    pub fn summary(&self) -> (usize, usize, usize) {
        let range = self.range();
        let first = if self.rows.is_empty() { 0 } else { range.start + 1 };
        (first, range.end, self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(n: usize) -> Paginator<usize> {
        let mut p = Paginator::new(10);
        p.set_data((0..n).collect());
        p
    }

    fn numbers(controls: &[PageControl]) -> Vec<Option<usize>> {
        controls
            .iter()
            .map(|c| match c {
                PageControl::Page { number, .. } => Some(*number),
                PageControl::Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn test_page_count_and_ranges() {
        for n in [0, 1, 9, 10, 11, 95, 100] {
            let mut p = pager(n);
            assert_eq!(p.page_count(), n.div_ceil(10));
            assert_eq!(p.range(), 0..n.min(10));

            if n > 0 {
                let last = p.page_count();
                p.go_to(last);
                assert!(!p.page().is_empty());
                assert_eq!(p.range().end, n);
            }
        }
    }

    #[test]
    fn test_set_data_resets_page() {
        let mut p = pager(45);
        p.go_to(4);
        assert_eq!(p.current_page(), 4);
        p.set_data((0..30).collect());
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_boundaries_disable_navigation() {
        let mut single = pager(7);
        assert!(!single.can_prev() && !single.can_next());
        assert!(!single.next());
        assert!(!single.go_to(2));

        for n in [11, 25, 101] {
            let mut p = pager(n);
            loop {
                assert!(p.can_prev() || p.can_next());
                if !p.next() {
                    break;
                }
            }
            assert_eq!(p.current_page(), p.page_count());
            assert!(!p.can_next());
        }
    }

    #[test]
    fn test_controls_window() {
        let mut p = pager(200);
        assert_eq!(
            numbers(&p.controls()),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(20)]
        );

        p.go_to(10);
        assert_eq!(
            numbers(&p.controls()),
            vec![Some(1), None, Some(8), Some(9), Some(10), Some(11), Some(12), None, Some(20)]
        );
        assert!(p.controls().contains(&PageControl::Page { number: 10, active: true }));

        p.go_to(20);
        assert_eq!(
            numbers(&p.controls()),
            vec![Some(1), None, Some(16), Some(17), Some(18), Some(19), Some(20)]
        );
    }

    #[test]
    fn test_controls_without_gaps() {
        let mut p = pager(60);
        p.go_to(4);
        // page 1 is adjacent to the window, no ellipsis
        assert_eq!(
            numbers(&p.controls()),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]
        );
        assert_eq!(numbers(&pager(30).controls()), vec![Some(1), Some(2), Some(3)]);
        assert!(pager(0).controls().is_empty());
    }

    #[test]
    fn test_summary() {
        let mut p = pager(23);
        assert_eq!(p.summary(), (1, 10, 23));
        p.go_to(3);
        assert_eq!(p.summary(), (21, 23, 23));
        assert_eq!(pager(0).summary(), (0, 0, 0));
    }
}
