//! Button-edge dispatch: presses to semantic feed actions.
//!
//! A press is recognized only on the released-to-pressed transition between
//! consecutive frames. The primary button carries double-press detection
//! (like, then unlike within the window); the unlike affordance can lag one
//! render cycle behind the like that created it, so the inverse action runs
//! through a bounded retry schedule instead of failing on the spot.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::engine::calibration::{pick_dominant_axis, AxisAssignment, StickSlot};
use crate::engine::selection::SelectionTracker;
use crate::feed::{ActionExecutor, FeedAction, FeedSurface, ItemDirectory};
use crate::input::{InputFrame, PadButton};

/// Delay before the post-jump-to-top reselection pass.
const JUMP_RESELECT_DELAY: Duration = Duration::from_millis(200);

/// Timing constants for press handling.
#[derive(Clone, Copy, Debug)]
pub struct DispatchTuning {
    pub double_press: Duration,
    pub retry_interval: Duration,
    pub retry_attempts: u8,
}

impl DispatchTuning {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            double_press: Duration::from_millis(config.double_press_ms),
            retry_interval: Duration::from_millis(config.retry_interval_ms),
            retry_attempts: config.retry_attempts,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingToggle {
    attempts_left: u8,
    next_attempt_at: Instant,
}

/// Edge detector and action router over per-frame button state.
#[derive(Debug)]
pub struct ActionDispatcher {
    tuning: DispatchTuning,
    prev_pressed: Vec<bool>,
    last_primary_press: Option<Instant>,
    pending_toggle: Option<PendingToggle>,
    reselect_after_jump: Option<Instant>,
}

impl ActionDispatcher {
    pub fn new(tuning: DispatchTuning) -> Self {
        Self {
            tuning,
            prev_pressed: Vec::new(),
            last_primary_press: None,
            pending_toggle: None,
            reselect_after_jump: None,
        }
    }

    /// Runs due scheduled work: unlike retries and the deferred post-jump
    /// reselection. Called every tick, with or without a fresh frame.
    pub fn run_scheduled<I, P>(
        &mut self,
        now: Instant,
        selection: &mut SelectionTracker<I>,
        page: &mut P,
    ) where
        I: Clone + PartialEq + Debug,
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        if let Some(toggle) = self.pending_toggle.take() {
            if now < toggle.next_attempt_at {
                self.pending_toggle = Some(toggle);
            } else {
                self.attempt_unlike(now, toggle.attempts_left, selection, page);
            }
        }

        if let Some(at) = self.reselect_after_jump {
            if now >= at {
                self.reselect_after_jump = None;
                selection.reconcile_on_scroll(0, now, page);
            }
        }
    }

    /// Compares the frame against the previous one and dispatches each
    /// released-to-pressed edge. The first frame only seeds history.
    pub fn process_frame<I, P>(
        &mut self,
        frame: &InputFrame,
        now: Instant,
        assignment: &mut AxisAssignment,
        selection: &mut SelectionTracker<I>,
        page: &mut P,
    ) where
        I: Clone + PartialEq + Debug,
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        let pressed = frame.pressed_mask();
        if self.prev_pressed.is_empty() {
            self.prev_pressed = pressed;
            return;
        }

        for index in 0..pressed.len() {
            if pressed[index] && !self.prev_pressed.get(index).copied().unwrap_or(false) {
                if let Some(button) = PadButton::from_index(index) {
                    debug!("button press: {:?}", button);
                    self.on_press(button, frame, now, assignment, selection, page);
                }
            }
        }

        self.prev_pressed = pressed;
    }

    fn on_press<I, P>(
        &mut self,
        button: PadButton,
        frame: &InputFrame,
        now: Instant,
        assignment: &mut AxisAssignment,
        selection: &mut SelectionTracker<I>,
        page: &mut P,
    ) where
        I: Clone + PartialEq + Debug,
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        // While typing, everything except back/cancel is swallowed.
        if page.editable_focused() && button != PadButton::B {
            debug!("press swallowed, editable control focused: {:?}", button);
            return;
        }

        match button {
            PadButton::A => self.on_primary(now, selection, page),
            PadButton::B => {
                if !page.execute(FeedAction::Back, None) {
                    debug!("back: no dismissable surface found");
                }
            }
            PadButton::X => Self::on_item_action(FeedAction::Reply, selection, page),
            PadButton::Y => Self::on_item_action(FeedAction::Repost, selection, page),
            PadButton::Menu => Self::on_item_action(FeedAction::OpenDetail, selection, page),
            PadButton::LeftBumper | PadButton::DPadLeft => selection.step(-1, true, page),
            PadButton::RightBumper | PadButton::DPadRight => selection.step(1, true, page),
            PadButton::LeftStick => {
                let pick = pick_dominant_axis(frame);
                assignment.assign(StickSlot::Left, pick.index);
            }
            PadButton::RightStick => {
                let pick = pick_dominant_axis(frame);
                assignment.assign(StickSlot::Right, pick.index);
            }
            PadButton::View => {
                page.scroll_to_top();
                self.reselect_after_jump = Some(now + JUMP_RESELECT_DELAY);
            }
            // Triggers are analog inputs; d-pad vertical drives the stepper.
            _ => {}
        }
    }

    /// Primary button: like on a single press, unlike on a double press.
    ///
    /// After a toggle the press history resets to idle rather than to now,
    /// so a third rapid press starts a fresh like instead of chaining.
    fn on_primary<I, P>(&mut self, now: Instant, selection: &mut SelectionTracker<I>, page: &mut P)
    where
        I: Clone + PartialEq + Debug,
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        if let Some(last) = self.last_primary_press {
            if now.duration_since(last) < self.tuning.double_press {
                self.last_primary_press = None;
                self.attempt_unlike(now, self.tuning.retry_attempts, selection, page);
                return;
            }
        }

        match selection.active(page) {
            Some(item) => {
                if !page.execute(FeedAction::Like, Some(&item)) {
                    warn!("like: affordance not found");
                }
            }
            None => debug!("like: no active item"),
        }
        self.last_primary_press = Some(now);
    }

    /// One unlike attempt; on a miss, re-arms the retry record until the
    /// budget runs out, then gives up silently.
    fn attempt_unlike<I, P>(
        &mut self,
        now: Instant,
        attempts_left: u8,
        selection: &mut SelectionTracker<I>,
        page: &mut P,
    ) where
        I: Clone + PartialEq + Debug,
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        let Some(item) = selection.active(page) else {
            debug!("unlike: no active item, dropping retry");
            return;
        };
        if page.execute(FeedAction::Unlike, Some(&item)) {
            info!("unlike: dispatched");
            return;
        }
        if attempts_left == 0 {
            debug!("unlike: giving up after retry budget");
            return;
        }
        self.pending_toggle = Some(PendingToggle {
            attempts_left: attempts_left - 1,
            next_attempt_at: now + self.tuning.retry_interval,
        });
    }

    fn on_item_action<I, P>(action: FeedAction, selection: &mut SelectionTracker<I>, page: &mut P)
    where
        I: Clone + PartialEq + Debug,
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        match selection.active(page) {
            Some(item) => {
                if !page.execute(action, Some(&item)) {
                    warn!("{}: affordance not found", action);
                }
            }
            None => debug!("{}: no active item", action),
        }
    }
}
