//! Collaborator contracts between the navigation engine and a concrete page.
//!
//! The engine never touches DOM-like structures directly. It talks to an
//! [`ItemDirectory`] (the ordered list of navigable entries), a [`FeedSurface`]
//! (viewport geometry and scrolling) and an [`ActionExecutor`] (the page-side
//! effect of a semantic action). A host embedding the engine implements these
//! three traits on its page adapter; [`VirtualFeed`] is the in-process
//! implementation used by the demo binary and the tests.

pub mod virtual_feed;

pub use virtual_feed::VirtualFeed;

use std::fmt;

/// Semantic actions the dispatcher can request from the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedAction {
    Like,
    Unlike,
    Reply,
    Repost,
    OpenDetail,
    Back,
}

impl fmt::Display for FeedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedAction::Like => write!(f, "like"),
            FeedAction::Unlike => write!(f, "unlike"),
            FeedAction::Reply => write!(f, "reply"),
            FeedAction::Repost => write!(f, "repost"),
            FeedAction::OpenDetail => write!(f, "open detail"),
            FeedAction::Back => write!(f, "back"),
        }
    }
}

/// Ordered directory of navigable feed entries.
///
/// `list()` must return a fresh snapshot in display order on every call; the
/// page may re-render between ticks and the engine always re-resolves handles
/// against the latest snapshot before indexing.
pub trait ItemDirectory {
    /// Opaque item handle. The engine never constructs or destroys items,
    /// it only compares and clones them.
    type Item: Clone + PartialEq + fmt::Debug;

    /// Fresh snapshot of all items in display order.
    fn list(&self) -> Vec<Self::Item>;

    /// True if any part of the item's bounding region intersects the viewport.
    fn is_visible(&self, item: &Self::Item) -> bool;

    /// Viewport-relative top edge of the item.
    fn bounding_top(&self, item: &Self::Item) -> f32;

    /// Viewport-relative bottom edge of the item.
    fn bounding_bottom(&self, item: &Self::Item) -> f32;

    /// Smooth-scrolls so the item is vertically centered.
    fn bring_into_view(&mut self, item: &Self::Item);
}

/// Scroll and focus state of the hosting surface.
pub trait FeedSurface {
    fn scroll_by(&mut self, dy: f32);

    fn scroll_to_top(&mut self);

    /// Current absolute scroll offset.
    fn scroll_position(&self) -> f32;

    fn viewport_height(&self) -> f32;

    /// True if the currently focused element is a text-input-like control.
    fn editable_focused(&self) -> bool;

    /// True if the host surface is user-visible. Sampling is gated on this;
    /// no navigation fires while the surface is backgrounded.
    fn is_host_visible(&self) -> bool;
}

/// Performs the page-specific effect of a semantic action.
///
/// Returns `true` when the target affordance was found and triggered. The
/// executor owns one-shot lookups only; retry scheduling stays in the engine.
pub trait ActionExecutor<I> {
    fn execute(&mut self, action: FeedAction, item: Option<&I>) -> bool;
}
