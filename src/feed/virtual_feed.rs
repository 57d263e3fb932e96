//! In-process feed simulation implementing all collaborator traits.
//!
//! Models a vertical feed of uniform-height cards behind a viewport. The demo
//! binary drives it from a real gamepad; the engine tests use it as a fixture
//! with scripted geometry and action outcomes.

use tracing::{debug, info};

use crate::feed::{ActionExecutor, FeedAction, FeedSurface, ItemDirectory};

/// Simulated scrollable feed of uniform-height items.
///
/// Items are opaque `u64` ids so that handle identity survives list mutation
/// (removing an item shifts positions but never renumbers the others).
#[derive(Debug)]
pub struct VirtualFeed {
    item_ids: Vec<u64>,
    next_id: u64,
    item_height: f32,
    viewport_height: f32,
    scroll_y: f32,
    editable_focused: bool,
    host_visible: bool,
    unlike_ready: bool,
    executed: Vec<(FeedAction, Option<u64>)>,
}

impl VirtualFeed {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_ids: (0..item_count as u64).collect(),
            next_id: item_count as u64,
            item_height: 180.0,
            viewport_height: 600.0,
            scroll_y: 0.0,
            editable_focused: false,
            host_visible: true,
            unlike_ready: true,
            executed: Vec::new(),
        }
    }

    /// Appends a new item at the end of the feed and returns its handle.
    pub fn push_item(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.item_ids.push(id);
        id
    }

    /// Removes an item, as a re-render dropping an entry would.
    pub fn remove_item(&mut self, id: u64) {
        self.item_ids.retain(|&existing| existing != id);
    }

    pub fn set_editable_focused(&mut self, focused: bool) {
        self.editable_focused = focused;
    }

    pub fn set_host_visible(&mut self, visible: bool) {
        self.host_visible = visible;
    }

    /// Controls whether the unlike affordance exists yet. The real page grows
    /// it one render cycle after a like lands, which is what the dispatcher's
    /// retry loop papers over.
    pub fn set_unlike_ready(&mut self, ready: bool) {
        self.unlike_ready = ready;
    }

    pub fn executed_actions(&self) -> &[(FeedAction, Option<u64>)] {
        &self.executed
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.item_ids.iter().position(|&existing| existing == id)
    }

    fn max_scroll(&self) -> f32 {
        let content = self.item_ids.len() as f32 * self.item_height;
        (content - self.viewport_height).max(0.0)
    }
}

impl ItemDirectory for VirtualFeed {
    type Item = u64;

    fn list(&self) -> Vec<u64> {
        self.item_ids.clone()
    }

    fn is_visible(&self, item: &u64) -> bool {
        match self.index_of(*item) {
            Some(_) => {
                self.bounding_bottom(item) > 0.0 && self.bounding_top(item) < self.viewport_height
            }
            None => false,
        }
    }

    fn bounding_top(&self, item: &u64) -> f32 {
        let index = self.index_of(*item).unwrap_or(0);
        index as f32 * self.item_height - self.scroll_y
    }

    fn bounding_bottom(&self, item: &u64) -> f32 {
        self.bounding_top(item) + self.item_height
    }

    fn bring_into_view(&mut self, item: &u64) {
        let Some(index) = self.index_of(*item) else {
            return;
        };
        let center = index as f32 * self.item_height + self.item_height / 2.0;
        self.scroll_y = (center - self.viewport_height / 2.0)
            .max(0.0)
            .min(self.max_scroll());
        debug!("brought item {} into view at y={:.1}", item, self.scroll_y);
    }
}

impl FeedSurface for VirtualFeed {
    fn scroll_by(&mut self, dy: f32) {
        self.scroll_y = (self.scroll_y + dy).max(0.0).min(self.max_scroll());
    }

    fn scroll_to_top(&mut self) {
        self.scroll_y = 0.0;
    }

    fn scroll_position(&self) -> f32 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn editable_focused(&self) -> bool {
        self.editable_focused
    }

    fn is_host_visible(&self) -> bool {
        self.host_visible
    }
}

impl ActionExecutor<u64> for VirtualFeed {
    fn execute(&mut self, action: FeedAction, item: Option<&u64>) -> bool {
        let found = match action {
            FeedAction::Unlike => self.unlike_ready,
            _ => true,
        };
        if found {
            info!("feed action: {} on {:?}", action, item);
            self.executed.push((action, item.copied()));
        } else {
            debug!("feed action: {} target not present", action);
        }
        found
    }
}
