//! Scroll state for a pane.
//!
//! A [`Viewport`] tracks the visible window over a list of lines and
//! implements [`ScrollSurface`] so panes can be kept in sync.

use std::ops::Range;

use crate::sync::{ScrollMetrics, ScrollSurface};

/// The visible portion of a pane's lines.
///
/// # Example
///
/// ```
/// use zenmark::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines on screen, clamped to the content.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    /// Place the viewport at `offset`, clamped.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    /// Scroll the least amount needed to show `line`.
    ///
    /// Returns true if the offset changed.
    pub fn ensure_visible(&mut self, line: usize) -> bool {
        let before = self.offset;
        let height = (self.height as usize).max(1);
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());
        self.offset != before
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the content length, keeping the offset valid.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

impl ScrollSurface for Viewport {
    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.offset, self.total_lines, self.height as usize)
    }

    fn set_scroll_top(&mut self, scroll_top: usize) {
        self.set_offset(scroll_top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_stops_at_bounds() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1_000);
        assert_eq!(vp.offset(), 76);
        assert_eq!(vp.visible_range(), 76..100);
        vp.scroll_up(1_000);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut vp = Viewport::new(80, 24, 10);
        vp.scroll_down(24);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..10);
        assert_eq!(vp.scroll_metrics().scroll_range(), 0);
    }

    #[test]
    fn test_go_to_top_resets_offset() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.set_offset(40);
        assert_eq!(vp.visible_range(), 40..50);
        vp.go_to_top();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_minimally() {
        let mut vp = Viewport::new(80, 10, 100);
        assert!(!vp.ensure_visible(9));
        assert!(vp.ensure_visible(10));
        assert_eq!(vp.offset(), 1);
        assert!(vp.ensure_visible(0));
        assert_eq!(vp.offset(), 0);
        vp.ensure_visible(500);
        assert_eq!(vp.offset(), 90);
    }

    #[test]
    fn test_resize_and_shrink_keep_offset_valid() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(50);
        vp.resize(80, 60);
        assert_eq!(vp.offset(), 40);
        vp.set_total_lines(50);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_scroll_metrics_match_offset() {
        let mut vp = Viewport::new(40, 20, 120);
        vp.set_scroll_top(50);
        assert_eq!(vp.scroll_metrics(), ScrollMetrics::new(50, 120, 20));
        vp.set_scroll_top(1_000);
        assert_eq!(vp.offset(), 100);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_never_exceeds_max(
                total_lines in 0..10000usize,
                height in 1..100u16,
                scroll_amount in 0..20000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(scroll_amount);
                prop_assert!(vp.offset() <= total_lines.saturating_sub(height as usize));
                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_lines);
            }

            #[test]
            fn ensure_visible_shows_line(
                total_lines in 1..5000usize,
                height in 1..100u16,
                line in 0..5000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                let line = line % total_lines;
                vp.ensure_visible(line);
                prop_assert!(vp.visible_range().contains(&line));
            }
        }
    }
}
