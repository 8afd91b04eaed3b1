// Scroll anchoring - keeps the view pinned to new output, unless the user
// has scrolled away
//
// The decision is re-made around every content mutation, in two phases
// that must not be reordered:
//   1. before the mutation, measure whether the view is (near) the bottom;
//   2. after the mutation, scroll to the bottom iff it was.
// Measuring after the append would always look "scrolled away" because the
// new content just grew the scroll height.
//
// The measurement/scroll capability is an injected trait so the heuristic
// is testable without a real rendering surface.

/// Slack below which the view still counts as "at the bottom", in layout
/// units. Tolerates rounding drift and intentional near-the-bottom
/// positioning.
pub const SCROLL_SLACK: u32 = 250;

/// Layout measurements of a scrollable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMetrics {
    /// Distance scrolled from the top of the content.
    pub scroll_top: u32,
    /// Height of the visible window.
    pub client_height: u32,
    /// Total height of the content.
    pub scroll_height: u32,
}

/// The capability the anchor needs from a live view.
pub trait ScrollSurface {
    fn metrics(&self) -> ViewMetrics;
    /// Bring the bottom sentinel into view.
    fn scroll_to_bottom(&mut self);
}

/// Per-view anchoring state machine.
#[derive(Debug, Clone)]
pub struct ScrollAnchor {
    should_auto_scroll: bool,
    slack: u32,
}

impl ScrollAnchor {
    /// Anchored by default: a freshly mounted view follows output.
    pub fn new() -> Self {
        Self::with_slack(SCROLL_SLACK)
    }

    /// Custom slack, for surfaces measured in units other than pixels
    /// (the terminal view passes rows).
    pub fn with_slack(slack: u32) -> Self {
        ScrollAnchor {
            should_auto_scroll: true,
            slack,
        }
    }

    pub fn should_auto_scroll(&self) -> bool {
        self.should_auto_scroll
    }

    /// Phase 1, immediately before content is applied: decide whether the
    /// user is following the output.
    pub fn before_update(&mut self, metrics: ViewMetrics) {
        let visible_bottom = metrics.scroll_top + metrics.client_height;
        self.should_auto_scroll = visible_bottom + self.slack >= metrics.scroll_height;
    }

    /// Phase 2, immediately after content is applied (and on mount):
    /// follow the output, or leave a reading user alone.
    pub fn after_update(&self, surface: &mut dyn ScrollSurface) {
        if self.should_auto_scroll {
            surface.scroll_to_bottom();
        }
    }
}

impl Default for ScrollAnchor {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal viewport
// ─────────────────────────────────────────────────────────────────────────────

/// Concrete scroll surface for the terminal view, measured in rows.
///
/// `scroll_top` is the index of the first visible scrollback row;
/// `client_height` is the last-known rendering area height;
/// `scroll_height` is the total number of rows in scrollback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewport {
    pub scroll_top: u32,
    pub client_height: u32,
    pub scroll_height: u32,
}

impl Viewport {
    /// Update content/window sizes, clamping the scroll position into the
    /// valid range. Called whenever content or the terminal size changes.
    pub fn set_extent(&mut self, scroll_height: u32, client_height: u32) {
        self.scroll_height = scroll_height;
        self.client_height = client_height;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
    }

    /// Scroll by a signed number of rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: i32) {
        let top = i64::from(self.scroll_top) + i64::from(delta);
        self.scroll_top = top.clamp(0, i64::from(self.max_scroll_top())) as u32;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_top = 0;
    }

    pub fn max_scroll_top(&self) -> u32 {
        self.scroll_height.saturating_sub(self.client_height)
    }
}

impl ScrollSurface for Viewport {
    fn metrics(&self) -> ViewMetrics {
        ViewMetrics {
            scroll_top: self.scroll_top,
            client_height: self.client_height,
            scroll_height: self.scroll_height,
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll_top();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(scroll_top: u32, client_height: u32, scroll_height: u32) -> Viewport {
        Viewport {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    #[test]
    fn near_bottom_view_follows_new_content() {
        let mut anchor = ScrollAnchor::new();
        let mut view = surface(1000, 500, 1200);

        anchor.before_update(view.metrics());
        view.scroll_height = 1400; // content appended
        anchor.after_update(&mut view);

        assert_eq!(view.scroll_top, view.max_scroll_top());
    }

    #[test]
    fn scrolled_away_view_stays_put() {
        let mut anchor = ScrollAnchor::new();
        let mut view = surface(0, 500, 5000);

        anchor.before_update(view.metrics());
        view.scroll_height = 5200;
        anchor.after_update(&mut view);

        assert_eq!(view.scroll_top, 0, "reading user must not be yanked down");
    }

    #[test]
    fn slack_boundary_is_inclusive() {
        let mut anchor = ScrollAnchor::with_slack(250);

        // visible_bottom + slack == scroll_height: still anchored.
        anchor.before_update(ViewMetrics {
            scroll_top: 0,
            client_height: 500,
            scroll_height: 750,
        });
        assert!(anchor.should_auto_scroll());

        // One unit past the slack: detached.
        anchor.before_update(ViewMetrics {
            scroll_top: 0,
            client_height: 500,
            scroll_height: 751,
        });
        assert!(!anchor.should_auto_scroll());
    }

    #[test]
    fn decision_is_remade_every_update() {
        let mut anchor = ScrollAnchor::with_slack(0);
        let mut view = surface(0, 10, 100);

        anchor.before_update(view.metrics());
        assert!(!anchor.should_auto_scroll());

        // User scrolls back to the bottom; the next update follows again.
        view.scroll_to_bottom();
        anchor.before_update(view.metrics());
        assert!(anchor.should_auto_scroll());
    }

    #[test]
    fn freshly_mounted_view_scrolls_to_bottom() {
        let anchor = ScrollAnchor::new();
        let mut view = surface(0, 10, 100);
        anchor.after_update(&mut view);
        assert_eq!(view.scroll_top, 90);
    }

    #[test]
    fn viewport_clamps_scrolling() {
        let mut view = surface(0, 10, 100);
        view.scroll_by(-5);
        assert_eq!(view.scroll_top, 0);

        view.scroll_by(1000);
        assert_eq!(view.scroll_top, 90);

        // Shrinking content pulls the offset back into range.
        view.set_extent(20, 10);
        assert_eq!(view.scroll_top, 10);
    }

    #[test]
    fn content_shorter_than_window_never_scrolls() {
        let mut view = surface(0, 50, 10);
        view.scroll_by(5);
        assert_eq!(view.scroll_top, 0);
        assert_eq!(view.max_scroll_top(), 0);
    }
}
