//! Leaderboard page rotation.
//!
//! Long leaderboards are split into fixed-size pages below a pinned top
//! prefix, and the visible page advances on a fixed interval with a short
//! transitional hold-off during which the outgoing page is hidden. The
//! whole scheduler runs on a virtual millisecond clock passed into
//! [`Rotator::tick`], so rotation logic is unit-testable without wall-clock
//! delays.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rotation parameters.
///
/// Views that differ only in page size, timing or pinned depth are the same
/// component with different values here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationParams {
    /// Top-ranked entries always visible, excluded from rotation
    #[serde(default = "default_pinned")]
    pub pinned: usize,

    /// Entries per rotating page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// How long each page stays visible, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Transitional hold-off between pages, in milliseconds
    #[serde(default = "default_holdoff_ms")]
    pub holdoff_ms: u64,
}

fn default_pinned() -> usize {
    3
}

fn default_page_size() -> usize {
    8
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_holdoff_ms() -> u64 {
    600
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            pinned: default_pinned(),
            page_size: default_page_size(),
            interval_ms: default_interval_ms(),
            holdoff_ms: default_holdoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No leaderboard, empty leaderboard, or stopped
    Inert,
    /// Everything fits on one page; never advances
    Static,
    /// Page shown until the deadline
    Visible { until_ms: u64 },
    /// Hold-off between pages; the page index still points at the outgoing
    /// page until the deadline expires
    Hidden { until_ms: u64 },
}

/// Page rotation state machine for one leaderboard.
#[derive(Debug, Clone)]
pub struct Rotator {
    params: RotationParams,
    len: usize,
    current_page: usize,
    phase: Phase,
}

impl Rotator {
    pub fn new(params: RotationParams) -> Self {
        Self {
            params,
            len: 0,
            current_page: 0,
            phase: Phase::Inert,
        }
    }

    /// Start rotating a leaderboard of `len` entries at virtual time `now_ms`.
    ///
    /// Always resets to page 0 and restarts the timer from zero. With no
    /// entries the rotator is inert; when everything beyond the pinned
    /// prefix fits on one page, that page is shown permanently.
    pub fn start(&mut self, len: usize, now_ms: u64) {
        self.len = len;
        self.current_page = 0;
        self.phase = if len == 0 {
            Phase::Inert
        } else if len.saturating_sub(self.params.pinned) <= self.params.page_size {
            Phase::Static
        } else {
            Phase::Visible {
                until_ms: now_ms + self.params.interval_ms,
            }
        };
        debug!("Rotation started: {} entries, {} pages", len, self.page_count());
    }

    /// Stop rotating. Cleared whenever navigation leaves the leaderboard,
    /// so a stale timer can never advance a page for a board that is no
    /// longer displayed.
    pub fn stop(&mut self) {
        self.len = 0;
        self.current_page = 0;
        self.phase = Phase::Inert;
    }

    /// Advance the virtual clock. Returns true when the visible output
    /// changed (page advanced or transition phase flipped).
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let mut changed = false;
        loop {
            match self.phase {
                Phase::Visible { until_ms } if now_ms >= until_ms => {
                    self.phase = Phase::Hidden {
                        until_ms: until_ms + self.params.holdoff_ms,
                    };
                    changed = true;
                }
                Phase::Hidden { until_ms } if now_ms >= until_ms => {
                    self.current_page = (self.current_page + 1) % self.page_count();
                    self.phase = Phase::Visible {
                        until_ms: until_ms + self.params.interval_ms,
                    };
                    changed = true;
                }
                _ => return changed,
            }
        }
    }

    /// Index of the currently visible rotating page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of rotating pages (0 for an empty leaderboard).
    pub fn page_count(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.len
                .saturating_sub(self.params.pinned)
                .div_ceil(self.params.page_size)
                .max(1)
        }
    }

    /// True while the hold-off keeps the outgoing page hidden.
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Hidden { .. })
    }

    /// True once a leaderboard is loaded (static or rotating).
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Inert)
    }

    /// Slice of entries pinned above the rotation.
    pub fn pinned_range(&self) -> Range<usize> {
        0..self.params.pinned.min(self.len)
    }

    /// Slice of entries on the currently visible page.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.params.pinned + self.current_page * self.params.page_size;
        let end = start + self.params.page_size;
        start.min(self.len)..end.min(self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pinned: usize, page_size: usize, interval_ms: u64, holdoff_ms: u64) -> RotationParams {
        RotationParams {
            pinned,
            page_size,
            interval_ms,
            holdoff_ms,
        }
    }

    #[test]
    fn test_empty_leaderboard_is_inert() {
        let mut rot = Rotator::new(params(3, 5, 1000, 100));
        rot.start(0, 0);

        assert!(!rot.is_active());
        assert_eq!(rot.page_count(), 0);
        assert!(!rot.tick(1_000_000));
        assert_eq!(rot.current_page(), 0);
    }

    #[test]
    fn test_short_leaderboard_never_advances() {
        // len <= P + S: single page shown permanently.
        let mut rot = Rotator::new(params(3, 5, 1000, 100));
        rot.start(8, 0);

        assert!(rot.is_active());
        for now in (0..20_000).step_by(250) {
            rot.tick(now);
            assert_eq!(rot.current_page(), 0);
            assert!(!rot.is_transitioning());
        }
    }

    #[test]
    fn test_fifty_entries_make_ten_pages() {
        // 50 entries, P=3, S=5 -> ceil(47/5) = 10 rotating pages.
        let mut rot = Rotator::new(params(3, 5, 1000, 100));
        rot.start(50, 0);
        assert_eq!(rot.page_count(), 10);
    }

    #[test]
    fn test_page_sequence_cycles_through_all_pages() {
        let mut rot = Rotator::new(params(3, 5, 1000, 100));
        rot.start(50, 0);

        let mut seen = vec![rot.current_page()];
        let mut now = 0u64;
        // Each advance takes interval + holdoff = 1100ms.
        for _ in 0..12 {
            now += 1100;
            rot.tick(now);
            seen.push(rot.current_page());
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2]);
    }

    #[test]
    fn test_holdoff_hides_before_advancing() {
        let mut rot = Rotator::new(params(0, 5, 1000, 200));
        rot.start(20, 0);

        // Still on page 0, visible, before the interval elapses.
        assert!(!rot.tick(999));
        assert_eq!(rot.current_page(), 0);
        assert!(!rot.is_transitioning());

        // Interval elapsed: hidden, but the data has not advanced yet.
        assert!(rot.tick(1000));
        assert!(rot.is_transitioning());
        assert_eq!(rot.current_page(), 0);

        // Hold-off elapsed: page advances and becomes visible.
        assert!(rot.tick(1200));
        assert!(!rot.is_transitioning());
        assert_eq!(rot.current_page(), 1);
    }

    #[test]
    fn test_tick_catches_up_after_long_gap() {
        let mut rot = Rotator::new(params(0, 5, 1000, 0));
        rot.start(20, 0); // 4 pages

        // Jump 3 full periods at once.
        rot.tick(3000);
        assert_eq!(rot.current_page(), 3);
    }

    #[test]
    fn test_start_resets_page_and_timer() {
        let mut rot = Rotator::new(params(0, 5, 1000, 0));
        rot.start(20, 0);
        rot.tick(2500);
        assert_eq!(rot.current_page(), 2);

        // New leaderboard: back to page 0, timer restarted from now.
        rot.start(20, 2500);
        assert_eq!(rot.current_page(), 0);
        assert!(!rot.tick(3400));
        assert_eq!(rot.current_page(), 0);
        assert!(rot.tick(3500));
        assert_eq!(rot.current_page(), 1);
    }

    #[test]
    fn test_stop_makes_rotator_inert() {
        let mut rot = Rotator::new(params(0, 5, 1000, 0));
        rot.start(20, 0);
        rot.tick(1500);
        rot.stop();

        assert!(!rot.is_active());
        assert_eq!(rot.current_page(), 0);
        assert!(!rot.tick(10_000));
    }

    #[test]
    fn test_visible_range_slices_below_pinned_prefix() {
        let mut rot = Rotator::new(params(3, 5, 1000, 100));
        rot.start(50, 0);

        assert_eq!(rot.pinned_range(), 0..3);
        assert_eq!(rot.visible_range(), 3..8);

        rot.tick(1100);
        assert_eq!(rot.visible_range(), 8..13);
    }

    #[test]
    fn test_last_page_range_is_clamped() {
        // 12 entries, P=3, S=5 -> pages cover 3..8 and 8..12.
        let mut rot = Rotator::new(params(3, 5, 1000, 0));
        rot.start(12, 0);
        assert_eq!(rot.page_count(), 2);

        rot.tick(1000);
        assert_eq!(rot.current_page(), 1);
        assert_eq!(rot.visible_range(), 8..12);
    }

    #[test]
    fn test_leaderboard_shorter_than_pinned_prefix() {
        let mut rot = Rotator::new(params(3, 5, 1000, 100));
        rot.start(2, 0);

        assert_eq!(rot.pinned_range(), 0..2);
        assert_eq!(rot.visible_range(), 2..2);
        rot.tick(50_000);
        assert_eq!(rot.current_page(), 0);
    }

    #[test]
    fn test_rotation_params_default() {
        let p = RotationParams::default();
        assert_eq!(p.pinned, 3);
        assert_eq!(p.page_size, 8);
        assert_eq!(p.interval_ms, 5000);
        assert_eq!(p.holdoff_ms, 600);
    }
}
