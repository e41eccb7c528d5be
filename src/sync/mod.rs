//! Proportional scroll synchronization between the editor and preview.
//!
//! A scroll on one pane marks it as driving. Right before the next draw,
//! [`ScrollSyncController::on_frame`] copies the driving pane's scroll
//! ratio onto the other pane. The driving mark is released after a short
//! quiet period so the programmatic scroll is not mistaken for user input.

use crate::timer::Debouncer;

/// Quiet period after a synchronized scroll, in milliseconds.
pub const QUIET_PERIOD_MS: u64 = 50;

/// Scroll geometry of a pane, in rendered lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_top: usize,
    pub scroll_height: usize,
    pub client_height: usize,
}

impl ScrollMetrics {
    pub const fn new(scroll_top: usize, scroll_height: usize, client_height: usize) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// How far the content can scroll.
    pub const fn scroll_range(&self) -> usize {
        self.scroll_height.saturating_sub(self.client_height)
    }

    /// Position within the scroll range, in `[0, 1]`. Content that fits the
    /// viewport has ratio 0.
    pub fn ratio(&self) -> f64 {
        let range = self.scroll_range();
        if range == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.scroll_top as f64 / range as f64;
        ratio.clamp(0.0, 1.0)
    }

    /// Scroll offset that puts this pane at `ratio` of its range.
    pub fn offset_for_ratio(&self, ratio: f64) -> usize {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            (ratio.clamp(0.0, 1.0) * self.scroll_range() as f64).round() as usize
        }
    }
}

/// Scroll offset for `target` that mirrors the position of `source`.
///
/// ```
/// use zenmark::sync::{ScrollMetrics, mirror_offset};
///
/// let editor = ScrollMetrics::new(750, 2000, 500);
/// let preview = ScrollMetrics::new(0, 1000, 400);
/// assert_eq!(mirror_offset(editor, preview), 300);
/// ```
pub fn mirror_offset(source: ScrollMetrics, target: ScrollMetrics) -> usize {
    target.offset_for_ratio(source.ratio())
}

/// A pane that can report and accept a scroll position.
pub trait ScrollSurface {
    fn scroll_metrics(&self) -> ScrollMetrics;
    fn set_scroll_top(&mut self, scroll_top: usize);
}

/// One of the two synchronized panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    pub const fn other(self) -> Self {
        match self {
            Self::Editor => Self::Preview,
            Self::Preview => Self::Editor,
        }
    }
}

/// Which scroll directions are mirrored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncDirection {
    /// Editor scrolls drive the preview; preview scrolls are independent.
    #[default]
    EditorToPreview,
    /// Either pane drives the other.
    Bidirectional,
}

#[derive(Debug, Clone)]
pub struct ScrollSyncController {
    direction: SyncDirection,
    driving: Option<Pane>,
    frame_pending: bool,
    release: Debouncer<Pane>,
}

impl Default for ScrollSyncController {
    fn default() -> Self {
        Self::new(SyncDirection::default())
    }
}

impl ScrollSyncController {
    pub const fn new(direction: SyncDirection) -> Self {
        Self {
            direction,
            driving: None,
            frame_pending: false,
            release: Debouncer::new(QUIET_PERIOD_MS),
        }
    }

    pub const fn direction(&self) -> SyncDirection {
        self.direction
    }

    pub const fn set_direction(&mut self, direction: SyncDirection) {
        self.direction = direction;
    }

    /// The pane currently driving synchronization, if any.
    pub const fn driving(&self) -> Option<Pane> {
        self.driving
    }

    pub const fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    const fn accepts(&self, source: Pane) -> bool {
        match (self.direction, source) {
            (_, Pane::Editor) | (SyncDirection::Bidirectional, Pane::Preview) => true,
            (SyncDirection::EditorToPreview, Pane::Preview) => false,
        }
    }

    /// Record a user scroll on `source`.
    ///
    /// `both_visible` is false when either pane is not on screen, in which
    /// case nothing is scheduled. Returns whether a sync was scheduled.
    pub fn on_scroll(&mut self, source: Pane, both_visible: bool) -> bool {
        if !both_visible || !self.accepts(source) {
            return false;
        }
        if self.driving == Some(source.other()) {
            return false;
        }
        self.driving = Some(source);
        self.frame_pending = true;
        true
    }

    /// Apply the pending sync before a draw. Several scrolls since the last
    /// frame collapse into this single update using the current positions.
    ///
    /// Returns the new scroll top of the passive pane.
    pub fn on_frame(
        &mut self,
        editor: Option<&mut dyn ScrollSurface>,
        preview: Option<&mut dyn ScrollSurface>,
        now_ms: u64,
    ) -> Option<usize> {
        if !std::mem::take(&mut self.frame_pending) {
            return None;
        }
        let driving = self.driving?;
        let (Some(editor), Some(preview)) = (editor, preview) else {
            self.driving = None;
            self.release.cancel();
            return None;
        };
        let (source, target): (&dyn ScrollSurface, &mut dyn ScrollSurface) = match driving {
            Pane::Editor => (&*editor, preview),
            Pane::Preview => (&*preview, editor),
        };
        let offset = mirror_offset(source.scroll_metrics(), target.scroll_metrics());
        target.set_scroll_top(offset);
        self.release.queue(driving, now_ms);
        Some(offset)
    }

    /// Release the driving pane once the quiet period has elapsed.
    /// Returns true when the driving mark was cleared.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.release.take_ready(now_ms) {
            Some(pane) if self.driving == Some(pane) && !self.frame_pending => {
                self.driving = None;
                true
            }
            Some(pane) if self.frame_pending => {
                // A newer scroll is waiting for its frame; keep the mark.
                self.release.queue(pane, now_ms);
                false
            }
            _ => false,
        }
    }

    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.release.remaining_ms(now_ms)
    }

    /// Drop all pending work.
    pub fn cancel(&mut self) {
        self.driving = None;
        self.frame_pending = false;
        self.release.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Surface(ScrollMetrics);

    impl ScrollSurface for Surface {
        fn scroll_metrics(&self) -> ScrollMetrics {
            self.0
        }

        fn set_scroll_top(&mut self, scroll_top: usize) {
            self.0.scroll_top = scroll_top;
        }
    }

    #[test]
    fn test_ratio_is_zero_when_content_fits() {
        assert!(ScrollMetrics::new(5, 10, 10).ratio().abs() < f64::EPSILON);
        assert!(ScrollMetrics::new(0, 3, 10).ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_is_clamped() {
        let metrics = ScrollMetrics::new(500, 100, 50);
        assert!((metrics.ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_half_way_editor_maps_to_half_way_preview() {
        let editor = ScrollMetrics::new(750, 2000, 500);
        assert!((editor.ratio() - 0.5).abs() < f64::EPSILON);
        let preview = ScrollMetrics::new(0, 1000, 400);
        assert_eq!(mirror_offset(editor, preview), 300);
    }

    #[test]
    fn test_editor_scroll_updates_preview_on_frame() {
        let mut sync = ScrollSyncController::default();
        let mut editor = Surface(ScrollMetrics::new(750, 2000, 500));
        let mut preview = Surface(ScrollMetrics::new(0, 1000, 400));

        assert!(sync.on_scroll(Pane::Editor, true));
        assert_eq!(sync.driving(), Some(Pane::Editor));
        let applied = sync.on_frame(Some(&mut editor), Some(&mut preview), 0);
        assert_eq!(applied, Some(300));
        assert_eq!(preview.0.scroll_top, 300);
    }

    #[test]
    fn test_no_frame_work_without_scroll() {
        let mut sync = ScrollSyncController::default();
        let mut editor = Surface(ScrollMetrics::new(10, 100, 10));
        let mut preview = Surface(ScrollMetrics::new(0, 100, 10));
        assert_eq!(sync.on_frame(Some(&mut editor), Some(&mut preview), 0), None);
        assert_eq!(preview.0.scroll_top, 0);
    }

    #[test]
    fn test_preview_scroll_ignored_by_default() {
        let mut sync = ScrollSyncController::default();
        assert!(!sync.on_scroll(Pane::Preview, true));
        assert_eq!(sync.driving(), None);
    }

    #[test]
    fn test_bidirectional_mode_syncs_preview_to_editor() {
        let mut sync = ScrollSyncController::new(SyncDirection::Bidirectional);
        let mut editor = Surface(ScrollMetrics::new(0, 300, 100));
        let mut preview = Surface(ScrollMetrics::new(50, 200, 100));
        assert!(sync.on_scroll(Pane::Preview, true));
        sync.on_frame(Some(&mut editor), Some(&mut preview), 0);
        assert_eq!(editor.0.scroll_top, 100);
    }

    #[test]
    fn test_passive_pane_scroll_ignored_during_quiet_period() {
        let mut sync = ScrollSyncController::new(SyncDirection::Bidirectional);
        let mut editor = Surface(ScrollMetrics::new(40, 200, 100));
        let mut preview = Surface(ScrollMetrics::new(0, 200, 100));
        sync.on_scroll(Pane::Editor, true);
        sync.on_frame(Some(&mut editor), Some(&mut preview), 1_000);

        assert!(!sync.on_scroll(Pane::Preview, true));
        assert!(!sync.tick(1_000 + QUIET_PERIOD_MS - 1));
        assert_eq!(sync.driving(), Some(Pane::Editor));

        assert!(sync.tick(1_000 + QUIET_PERIOD_MS));
        assert_eq!(sync.driving(), None);
        assert!(sync.on_scroll(Pane::Preview, true));
    }

    #[test]
    fn test_burst_of_scrolls_collapses_to_latest_position() {
        let mut sync = ScrollSyncController::default();
        let mut editor = Surface(ScrollMetrics::new(0, 200, 100));
        let mut preview = Surface(ScrollMetrics::new(0, 400, 100));
        for top in [10, 20, 50] {
            editor.0.scroll_top = top;
            sync.on_scroll(Pane::Editor, true);
        }
        assert_eq!(sync.on_frame(Some(&mut editor), Some(&mut preview), 0), Some(150));
        assert_eq!(sync.on_frame(Some(&mut editor), Some(&mut preview), 1), None);
    }

    #[test]
    fn test_hidden_pane_is_noop() {
        let mut sync = ScrollSyncController::default();
        assert!(!sync.on_scroll(Pane::Editor, false));

        let mut editor = Surface(ScrollMetrics::new(10, 100, 10));
        sync.on_scroll(Pane::Editor, true);
        assert_eq!(sync.on_frame(Some(&mut editor), None, 0), None);
        assert_eq!(sync.driving(), None);
    }

    #[test]
    fn test_cancel_clears_everything() {
        let mut sync = ScrollSyncController::default();
        sync.on_scroll(Pane::Editor, true);
        sync.cancel();
        assert_eq!(sync.driving(), None);
        assert!(!sync.is_frame_pending());
        assert_eq!(sync.remaining_ms(0), None);
    }
}
