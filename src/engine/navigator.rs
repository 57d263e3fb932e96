//! Per-frame orchestration of the navigation engine.
//!
//! One [`NavigationEngine`] instance holds every piece of mutable session
//! state (axis assignment, hold timers, selection, press history, scroll
//! memory) and is driven by a single `tick` per animation frame. There is no
//! parallelism to guard against: collaborators are borrowed for the duration
//! of a tick and the only other entry point, the external scroll notice, is
//! a flag coalesced into the next tick.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::calibration::AxisAssignment;
use crate::engine::dispatch::{ActionDispatcher, DispatchTuning};
use crate::engine::scroll::{ContinuousScroll, ScrollTuning};
use crate::engine::selection::SelectionTracker;
use crate::engine::stepper::{DiscreteStepper, StepTuning};
use crate::feed::{ActionExecutor, FeedSurface, ItemDirectory};
use crate::input::{InputFrame, PadButton};

/// Throttle for the "waiting for gamepad" diagnostic.
const IDLE_LOG_INTERVAL: Duration = Duration::from_secs(2);

/// The complete input-to-navigation state machine for one session.
pub struct NavigationEngine<I> {
    scroll_tuning: ScrollTuning,
    step_tuning: StepTuning,
    axis_log_interval: Duration,
    stick_reselect_block: Duration,

    axes: AxisAssignment,
    scroll: ContinuousScroll,
    stepper: DiscreteStepper,
    selection: SelectionTracker<I>,
    dispatcher: ActionDispatcher,

    // Scroll memory: distinguishes controller-driven movement from
    // externally observed scrolling.
    last_scroll_y: f32,
    last_controller_scroll_at: Option<Instant>,
    pending_scroll_notice: bool,

    last_axis_log: Option<Instant>,
    last_idle_log: Option<Instant>,
}

impl<I: Clone + PartialEq + Debug> NavigationEngine<I> {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scroll_tuning: ScrollTuning::from_config(config),
            step_tuning: StepTuning::from_config(config),
            axis_log_interval: Duration::from_millis(config.axis_log_interval_ms),
            stick_reselect_block: Duration::from_millis(config.stick_reselect_block_ms),
            axes: AxisAssignment::new(config.left_stick_axis, config.right_stick_axis),
            scroll: ContinuousScroll::new(),
            stepper: DiscreteStepper::new(),
            selection: SelectionTracker::new(Duration::from_millis(config.reselect_interval_ms)),
            dispatcher: ActionDispatcher::new(DispatchTuning::from_config(config)),
            last_scroll_y: 0.0,
            last_controller_scroll_at: None,
            pending_scroll_notice: false,
            last_axis_log: None,
            last_idle_log: None,
        }
    }

    /// Flags that the surface scrolled for a reason the engine may not have
    /// caused. Coalesced: any number of notices collapse into one
    /// reconciliation pass on the next tick.
    pub fn note_external_scroll(&mut self) {
        self.pending_scroll_notice = true;
    }

    pub fn active_item(&self) -> Option<&I> {
        self.selection.current()
    }

    pub fn axis_assignment(&self) -> AxisAssignment {
        self.axes
    }

    /// Advances the engine by one frame.
    ///
    /// Scheduled work and scroll-notice reconciliation always run; frame
    /// processing is skipped when no device is present or the host surface
    /// is not visible, with only a throttled diagnostic left behind.
    pub fn tick<P>(&mut self, now: Instant, frame: Option<&InputFrame>, page: &mut P)
    where
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        self.dispatcher.run_scheduled(now, &mut self.selection, page);
        self.process_scroll_notice(now, page);

        let Some(frame) = frame else {
            self.log_idle(now, "waiting for gamepad");
            return;
        };
        if !page.is_host_visible() {
            self.log_idle(now, "host surface not visible");
            return;
        }

        self.handle_frame(now, frame, page);
    }

    fn handle_frame<P>(&mut self, now: Instant, frame: &InputFrame, page: &mut P)
    where
        P: ItemDirectory<Item = I> + FeedSurface + ActionExecutor<I>,
    {
        let left = frame.axis(self.axes.left);
        let right = frame.axis(self.axes.right);

        if self
            .last_axis_log
            .map(|at| now.duration_since(at) >= self.axis_log_interval)
            .unwrap_or(true)
        {
            self.last_axis_log = Some(now);
            debug!(
                "axis L/R {:.2}/{:.2} (idx {}/{})",
                left, right, self.axes.left, self.axes.right
            );
        }

        // Stick: smooth scrolling, boosted by the right trigger.
        let boost = frame.button_value(PadButton::RightTrigger);
        if let Some(dy) = self
            .scroll
            .update(now, left, right, boost, &self.scroll_tuning)
        {
            page.scroll_by(dy);
            self.last_controller_scroll_at = Some(now);
        }

        // D-pad vertical: item-by-item selection with repeat while held.
        let up = frame.pressed(PadButton::DPadUp);
        let down = frame.pressed(PadButton::DPadDown);
        if let Some(direction) = self.stepper.update(now, up, down, &self.step_tuning) {
            self.selection.step(direction as i32, true, page);
        }

        self.dispatcher
            .process_frame(frame, now, &mut self.axes, &mut self.selection, page);
    }

    fn process_scroll_notice<P>(&mut self, now: Instant, page: &mut P)
    where
        P: ItemDirectory<Item = I> + FeedSurface,
    {
        if !self.pending_scroll_notice {
            return;
        }
        self.pending_scroll_notice = false;

        // The controller's own step logic owns selection right after a
        // stick scroll; an independent pass here would double-step.
        if let Some(at) = self.last_controller_scroll_at {
            if now.duration_since(at) < self.stick_reselect_block {
                return;
            }
        }

        let current_y = page.scroll_position();
        let direction: i8 = if current_y > self.last_scroll_y {
            1
        } else if current_y < self.last_scroll_y {
            -1
        } else {
            0
        };
        self.last_scroll_y = current_y;
        self.selection.reconcile_on_scroll(direction, now, page);
    }

    fn log_idle(&mut self, now: Instant, reason: &str) {
        let due = self
            .last_idle_log
            .map(|at| now.duration_since(at) >= IDLE_LOG_INTERVAL)
            .unwrap_or(true);
        if due {
            self.last_idle_log = Some(now);
            debug!("{}", reason);
        }
        // Dropping input also drops any in-flight holds.
        self.scroll.reset();
        self.stepper.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedAction, VirtualFeed};
    use crate::input::ButtonSample;

    fn engine() -> NavigationEngine<u64> {
        NavigationEngine::new(&EngineConfig::default())
    }

    fn neutral_frame() -> InputFrame {
        InputFrame {
            axes: vec![0.0; 6],
            buttons: vec![ButtonSample::default(); PadButton::COUNT],
        }
    }

    fn frame_with_axis(index: usize, value: f32) -> InputFrame {
        let mut frame = neutral_frame();
        frame.axes[index] = value;
        frame
    }

    fn frame_with_button(button: PadButton) -> InputFrame {
        let mut frame = neutral_frame();
        frame.buttons[button.index()] = ButtonSample {
            pressed: true,
            value: 1.0,
        };
        frame
    }

    #[test]
    fn stick_hold_scrolls_the_surface() {
        let mut engine = engine();
        let mut feed = VirtualFeed::new(40);
        let t0 = Instant::now();

        engine.tick(t0, Some(&frame_with_axis(1, 1.0)), &mut feed);
        let after_first = feed.scroll_position();
        assert!(after_first > 0.0);

        engine.tick(
            t0 + Duration::from_millis(600),
            Some(&frame_with_axis(1, 1.0)),
            &mut feed,
        );
        // Fully ramped: a 22-unit frame.
        assert!((feed.scroll_position() - after_first - 22.0).abs() < 1e-3);
    }

    #[test]
    fn dpad_hold_steps_selection_with_repeat() {
        let mut engine = engine();
        let mut feed = VirtualFeed::new(40);
        let t0 = Instant::now();

        engine.tick(t0, Some(&frame_with_button(PadButton::DPadDown)), &mut feed);
        let first = engine.active_item().copied().unwrap();

        // Held shorter than the initial delay: no repeat yet.
        engine.tick(
            t0 + Duration::from_millis(200),
            Some(&frame_with_button(PadButton::DPadDown)),
            &mut feed,
        );
        assert_eq!(engine.active_item().copied(), Some(first));

        engine.tick(
            t0 + Duration::from_millis(330),
            Some(&frame_with_button(PadButton::DPadDown)),
            &mut feed,
        );
        assert_eq!(engine.active_item().copied(), Some(first + 1));
    }

    #[test]
    fn external_scroll_is_suppressed_after_controller_scroll() {
        let mut engine = engine();
        let mut feed = VirtualFeed::new(40);
        let t0 = Instant::now();

        engine.tick(t0, Some(&frame_with_axis(1, 1.0)), &mut feed);
        assert!(engine.active_item().is_none());

        engine.note_external_scroll();
        engine.tick(
            t0 + Duration::from_millis(100),
            Some(&neutral_frame()),
            &mut feed,
        );
        assert!(
            engine.active_item().is_none(),
            "notice inside the 400ms window must not reselect"
        );

        engine.note_external_scroll();
        engine.tick(
            t0 + Duration::from_millis(600),
            Some(&neutral_frame()),
            &mut feed,
        );
        assert!(engine.active_item().is_some());
    }

    #[test]
    fn scroll_notices_coalesce_into_one_pass() {
        let mut engine = engine();
        let mut feed = VirtualFeed::new(40);
        let t0 = Instant::now();

        feed.scroll_by(500.0);
        for _ in 0..10 {
            engine.note_external_scroll();
        }
        engine.tick(t0, None, &mut feed);
        let picked = engine.active_item().copied();
        assert!(picked.is_some());

        // No further notice pending: geometry changes alone do nothing.
        feed.scroll_by(1_000.0);
        engine.tick(t0 + Duration::from_millis(500), None, &mut feed);
        assert_eq!(engine.active_item().copied(), picked);
    }

    #[test]
    fn hidden_surface_freezes_navigation() {
        let mut engine = engine();
        let mut feed = VirtualFeed::new(40);
        let t0 = Instant::now();
        feed.set_host_visible(false);

        engine.tick(t0, Some(&frame_with_axis(1, 1.0)), &mut feed);
        assert_eq!(feed.scroll_position(), 0.0);
        engine.tick(
            t0 + Duration::from_millis(16),
            Some(&frame_with_button(PadButton::A)),
            &mut feed,
        );
        assert!(feed.executed_actions().is_empty());
    }

    #[test]
    fn like_flows_through_dispatch_on_real_ticks() {
        let mut engine = engine();
        let mut feed = VirtualFeed::new(40);
        let t0 = Instant::now();

        // Seed edge history, then press A.
        engine.tick(t0, Some(&neutral_frame()), &mut feed);
        engine.tick(
            t0 + Duration::from_millis(16),
            Some(&frame_with_button(PadButton::A)),
            &mut feed,
        );
        let actions: Vec<_> = feed.executed_actions().iter().map(|(a, _)| *a).collect();
        assert_eq!(actions, vec![FeedAction::Like]);
    }
}
