//! Discrete step navigation with accelerating repeat.
//!
//! A held digital direction fires one step immediately, then repeats at a
//! delay that shrinks linearly from the initial value to a floor over the
//! acceleration window. Both directions pressed at once is a deliberate
//! no-op, not an error.

use std::time::{Duration, Instant};

use crate::config::EngineConfig;

/// Timing constants for the step repeat ramp.
#[derive(Clone, Copy, Debug)]
pub struct StepTuning {
    pub initial_delay: Duration,
    pub min_delay: Duration,
    pub accel: Duration,
}

impl StepTuning {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.nav_initial_delay_ms),
            min_delay: Duration::from_millis(config.nav_min_delay_ms),
            accel: Duration::from_millis(config.nav_accel_ms),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct StepHold {
    started_at: Instant,
    direction: i8,
    next_step_at: Instant,
}

/// Repeat-timer state machine for pad-driven step navigation.
#[derive(Debug, Default)]
pub struct DiscreteStepper {
    hold: Option<StepHold>,
}

impl DiscreteStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits at most one step per frame for the held direction.
    ///
    /// A new direction (first press or reversal) fires immediately and arms
    /// the repeat timer; releasing, or pressing both directions, clears all
    /// repeat state.
    pub fn update(
        &mut self,
        now: Instant,
        up_pressed: bool,
        down_pressed: bool,
        tuning: &StepTuning,
    ) -> Option<i8> {
        let direction: i8 = match (up_pressed, down_pressed) {
            (true, false) => -1,
            (false, true) => 1,
            _ => {
                self.hold = None;
                return None;
            }
        };

        match self.hold {
            Some(ref mut hold) if hold.direction == direction => {
                if now < hold.next_step_at {
                    return None;
                }
                let held = now.duration_since(hold.started_at);
                hold.next_step_at = now + Self::repeat_delay(held, tuning);
                Some(direction)
            }
            _ => {
                self.hold = Some(StepHold {
                    started_at: now,
                    direction,
                    next_step_at: now + tuning.initial_delay,
                });
                Some(direction)
            }
        }
    }

    fn repeat_delay(held: Duration, tuning: &StepTuning) -> Duration {
        let held_fraction = if tuning.accel.is_zero() {
            1.0
        } else {
            (held.as_secs_f32() / tuning.accel.as_secs_f32()).min(1.0)
        };
        let span = tuning.initial_delay.as_secs_f32() - tuning.min_delay.as_secs_f32();
        Duration::from_secs_f32(tuning.initial_delay.as_secs_f32() - span * held_fraction)
    }

    pub fn reset(&mut self) {
        self.hold = None;
    }
}
