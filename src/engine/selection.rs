//! Active-item tracking, reconciled with viewport geometry.
//!
//! Exactly one item (or none) is active at a time. Handles are re-resolved
//! against a fresh directory snapshot before every use, so a page re-render
//! between frames can never leave the engine pointing at a ghost entry.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::feed::{FeedSurface, ItemDirectory};

/// Viewport fraction an auto-picked item should sit nearest to.
const SELECT_ANCHOR: f32 = 0.35;

/// Scrolling down advances selection once the active item's top edge rises
/// above this viewport fraction.
const UPPER_BAND: f32 = 0.20;

/// Scrolling up retreats selection once the active item's bottom edge falls
/// below this viewport fraction.
const LOWER_BAND: f32 = 0.80;

/// Tracks the active item and keeps it consistent with what is on screen.
#[derive(Debug)]
pub struct SelectionTracker<I> {
    active: Option<I>,
    last_reselect_at: Option<Instant>,
    reselect_interval: Duration,
}

impl<I: Clone + PartialEq + Debug> SelectionTracker<I> {
    pub fn new(reselect_interval: Duration) -> Self {
        Self {
            active: None,
            last_reselect_at: None,
            reselect_interval,
        }
    }

    /// The raw tracked handle, without re-validation.
    pub fn current(&self) -> Option<&I> {
        self.active.as_ref()
    }

    /// Returns the active item, re-resolving against a fresh snapshot.
    ///
    /// A stale or missing handle is replaced by the visible item nearest to
    /// the anchor line (35% of viewport height); an empty directory yields
    /// `None` and leaves state untouched.
    pub fn active<P>(&mut self, page: &P) -> Option<I>
    where
        P: ItemDirectory<Item = I> + FeedSurface,
    {
        let list = page.list();
        if let Some(item) = &self.active {
            if list.contains(item) {
                return Some(item.clone());
            }
        }
        if list.is_empty() {
            return None;
        }
        let pick = list[Self::anchor_index(&list, page)].clone();
        debug!("active item re-resolved: {:?}", pick);
        self.active = Some(pick.clone());
        Some(pick)
    }

    /// Moves the selection by `delta` positions, clamped to the list bounds.
    pub fn step<P>(&mut self, delta: i32, bring_into_view: bool, page: &mut P)
    where
        P: ItemDirectory<Item = I> + FeedSurface,
    {
        let list = page.list();
        if list.is_empty() {
            debug!("step: directory is empty");
            return;
        }
        let index = self
            .active
            .as_ref()
            .and_then(|item| list.iter().position(|candidate| candidate == item))
            .unwrap_or_else(|| Self::nearest_index(&list, page));
        let next = (index as i32 + delta).clamp(0, list.len() as i32 - 1) as usize;
        let target = list[next].clone();
        if bring_into_view {
            page.bring_into_view(&target);
        }
        self.active = Some(target);
    }

    /// Re-derives the selection after the viewport moved.
    ///
    /// Rate-limited; at most one reselection per interval regardless of how
    /// often scroll events fire. With a trustworthy active item the
    /// selection is nudged one step ahead of the scroll direction instead
    /// of snapping on every pixel of movement.
    pub fn reconcile_on_scroll<P>(&mut self, direction: i8, now: Instant, page: &mut P)
    where
        P: ItemDirectory<Item = I> + FeedSurface,
    {
        if let Some(last) = self.last_reselect_at {
            if now.duration_since(last) < self.reselect_interval {
                return;
            }
        }
        let list = page.list();
        if list.is_empty() {
            return;
        }

        let anchored = self
            .active
            .as_ref()
            .filter(|item| list.contains(item) && page.is_visible(item))
            .cloned();

        let Some(item) = anchored else {
            self.active = Some(list[Self::anchor_index(&list, page)].clone());
            self.last_reselect_at = Some(now);
            return;
        };
        if direction == 0 {
            self.active = Some(list[Self::anchor_index(&list, page)].clone());
            self.last_reselect_at = Some(now);
            return;
        }

        let viewport = page.viewport_height();
        if direction > 0 && page.bounding_top(&item) < viewport * UPPER_BAND {
            self.step(1, false, page);
            self.last_reselect_at = Some(now);
        } else if direction < 0 && page.bounding_bottom(&item) > viewport * LOWER_BAND {
            self.step(-1, false, page);
            self.last_reselect_at = Some(now);
        }
    }

    /// Index of the visible item nearest the anchor line; falls back to the
    /// whole list when nothing is visible. Strict comparison keeps the
    /// smallest index on exact ties.
    fn anchor_index<P>(list: &[I], page: &P) -> usize
    where
        P: ItemDirectory<Item = I> + FeedSurface,
    {
        let visible: Vec<usize> = (0..list.len())
            .filter(|&i| page.is_visible(&list[i]))
            .collect();
        if visible.is_empty() {
            return Self::nearest_index(list, page);
        }
        let anchor = page.viewport_height() * SELECT_ANCHOR;
        let mut best = visible[0];
        let mut best_distance = f32::MAX;
        for index in visible {
            let distance = (page.bounding_top(&list[index]) - anchor).abs();
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        best
    }

    fn nearest_index<P>(list: &[I], page: &P) -> usize
    where
        P: ItemDirectory<Item = I> + FeedSurface,
    {
        let anchor = page.viewport_height() * SELECT_ANCHOR;
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (index, item) in list.iter().enumerate() {
            let distance = (page.bounding_top(item) - anchor).abs();
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::VirtualFeed;

    fn tracker() -> SelectionTracker<u64> {
        SelectionTracker::new(Duration::from_millis(160))
    }

    #[test]
    fn active_picks_item_nearest_anchor_line() {
        let feed = VirtualFeed::new(10);
        let mut selection = tracker();
        // Anchor sits at 210px; item 1 spans 180..360 (top at 180, distance
        // 30) while item 0's top is at distance 210.
        assert_eq!(selection.active(&feed), Some(1));
    }

    #[test]
    fn stale_handle_is_re_resolved() {
        let mut feed = VirtualFeed::new(5);
        let mut selection = tracker();
        selection.step(0, false, &mut feed);
        let first = selection.current().copied().unwrap();
        feed.remove_item(first);
        let replacement = selection.active(&feed).unwrap();
        assert_ne!(replacement, first);
        assert!(feed.list().contains(&replacement));
    }

    #[test]
    fn step_clamps_at_both_ends() {
        let mut feed = VirtualFeed::new(3);
        let mut selection = tracker();
        selection.step(10, false, &mut feed);
        assert_eq!(selection.current(), Some(&2));
        selection.step(5, false, &mut feed);
        assert_eq!(selection.current(), Some(&2));
        selection.step(-99, false, &mut feed);
        assert_eq!(selection.current(), Some(&0));
    }

    #[test]
    fn step_with_bring_into_view_centers_target() {
        let mut feed = VirtualFeed::new(30);
        let mut selection = tracker();
        selection.step(0, false, &mut feed);
        for _ in 0..10 {
            selection.step(1, true, &mut feed);
        }
        let item = selection.current().copied().unwrap();
        let center = feed.bounding_top(&item) + 90.0;
        assert!((center - 300.0).abs() < 1.0);
    }

    #[test]
    fn reconcile_is_rate_limited_to_interval() {
        let mut feed = VirtualFeed::new(20);
        let mut selection = tracker();
        let t0 = Instant::now();

        selection.reconcile_on_scroll(0, t0, &mut feed);
        let picked = selection.current().copied();

        // Push the viewport far enough that a re-pick would land elsewhere.
        feed.scroll_by(1_000.0);
        selection.reconcile_on_scroll(0, t0 + Duration::from_millis(100), &mut feed);
        assert_eq!(selection.current().copied(), picked, "fired within 160ms");

        selection.reconcile_on_scroll(0, t0 + Duration::from_millis(170), &mut feed);
        assert_ne!(selection.current().copied(), picked);
    }

    #[test]
    fn downward_scroll_advances_when_item_leaves_upper_band() {
        let mut feed = VirtualFeed::new(20);
        let mut selection = tracker();
        let t0 = Instant::now();
        selection.reconcile_on_scroll(0, t0, &mut feed);
        let before = selection.current().copied().unwrap();

        // Scroll down until the active item's top is above 20% of 600px.
        feed.scroll_by(before as f32 * 180.0 + 70.0);
        selection.reconcile_on_scroll(1, t0 + Duration::from_millis(200), &mut feed);
        assert_eq!(selection.current().copied(), Some(before + 1));
    }

    #[test]
    fn upward_scroll_retreats_when_item_falls_below_lower_band() {
        let mut feed = VirtualFeed::new(20);
        let mut selection = tracker();
        let t0 = Instant::now();
        feed.scroll_by(1_800.0);
        selection.reconcile_on_scroll(0, t0, &mut feed);
        let before = selection.current().copied().unwrap();

        // Scroll up so the active item's bottom drops past 80% of 600px.
        feed.scroll_by(feed.bounding_bottom(&before) - 500.0);
        selection.reconcile_on_scroll(-1, t0 + Duration::from_millis(200), &mut feed);
        assert_eq!(selection.current().copied(), Some(before - 1));
    }

    #[test]
    fn invisible_active_item_triggers_re_pick() {
        let mut feed = VirtualFeed::new(20);
        let mut selection = tracker();
        let t0 = Instant::now();
        selection.reconcile_on_scroll(0, t0, &mut feed);
        let before = selection.current().copied().unwrap();

        feed.scroll_by(2_000.0);
        selection.reconcile_on_scroll(1, t0 + Duration::from_millis(200), &mut feed);
        let after = selection.current().copied().unwrap();
        assert_ne!(after, before);
        assert!(feed.is_visible(&after));
    }
}
