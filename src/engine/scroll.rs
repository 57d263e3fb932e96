//! Continuous scrolling from analog stick deflection.
//!
//! Speed ramps linearly over a hold window so short taps stay precise while
//! sustained holds traverse fast, and the post-deadzone magnitude rescales
//! the result so near-deadzone input crawls. A boost trigger adds headroom
//! on top of the ramp, scaled by the same hold fraction.

use std::time::{Duration, Instant};

use crate::config::EngineConfig;

/// Speed and timing constants for the continuous scroll ramp.
#[derive(Clone, Copy, Debug)]
pub struct ScrollTuning {
    pub deadzone: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub accel: Duration,
    pub trigger_boost: f32,
}

impl ScrollTuning {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            deadzone: config.deadzone,
            min_speed: config.scroll_min_speed,
            max_speed: config.scroll_max_speed,
            accel: Duration::from_millis(config.scroll_accel_ms),
            trigger_boost: config.trigger_boost,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ScrollHold {
    started_at: Instant,
    sign: i8,
}

/// Hold-timer state machine turning axis values into per-frame scroll deltas.
#[derive(Debug, Default)]
pub struct ContinuousScroll {
    hold: Option<ScrollHold>,
}

impl ContinuousScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes this frame's signed scroll delta.
    ///
    /// Prefers the left axis, falls back to the right; neither past the
    /// deadzone resets the hold timer and yields `None`. A sign flip also
    /// resets the timer, so reversals restart from minimum speed.
    pub fn update(
        &mut self,
        now: Instant,
        left: f32,
        right: f32,
        boost: f32,
        tuning: &ScrollTuning,
    ) -> Option<f32> {
        let value = if left.abs() > tuning.deadzone {
            left
        } else if right.abs() > tuning.deadzone {
            right
        } else {
            self.hold = None;
            return None;
        };

        let sign: i8 = if value < 0.0 { -1 } else { 1 };
        let started_at = match self.hold {
            Some(hold) if hold.sign == sign => hold.started_at,
            _ => {
                self.hold = Some(ScrollHold {
                    started_at: now,
                    sign,
                });
                now
            }
        };

        let held = now.duration_since(started_at);
        let held_fraction = if tuning.accel.is_zero() {
            1.0
        } else {
            (held.as_secs_f32() / tuning.accel.as_secs_f32()).min(1.0)
        };
        let magnitude_fraction =
            ((value.abs() - tuning.deadzone) / (1.0 - tuning.deadzone)).min(1.0);

        let base = tuning.min_speed + (tuning.max_speed - tuning.min_speed) * held_fraction;
        let speed = (base + boost * tuning.trigger_boost * held_fraction) * magnitude_fraction;

        Some(sign as f32 * speed)
    }

    pub fn reset(&mut self) {
        self.hold = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> ScrollTuning {
        ScrollTuning::from_config(&EngineConfig::default())
    }

    #[test]
    fn speed_matches_reference_scenario() {
        // axis 0.5, held 0 ms: magnitude (0.5-0.18)/0.82, no ramp yet.
        let mut scroll = ContinuousScroll::new();
        let now = Instant::now();
        let dy = scroll.update(now, 0.5, 0.0, 0.0, &tuning()).unwrap();
        let expected = 2.0 * (0.5 - 0.18) / (1.0 - 0.18);
        assert!((dy - expected).abs() < 1e-4, "got {dy}, want {expected}");
        assert!((dy - 0.78).abs() < 0.01);
    }

    #[test]
    fn ramp_is_monotonic_and_caps() {
        let mut scroll = ContinuousScroll::new();
        let t0 = Instant::now();
        let tuning = tuning();
        let mut previous = 0.0;
        for ms in [0u64, 100, 250, 400, 500, 800] {
            let dy = scroll
                .update(t0 + Duration::from_millis(ms), 1.0, 0.0, 0.0, &tuning)
                .unwrap();
            assert!(dy >= previous, "speed regressed at {ms}ms");
            previous = dy;
        }
        // Saturated at full magnitude: exactly max speed.
        assert!((previous - 22.0).abs() < 1e-3);
    }

    #[test]
    fn boost_caps_at_max_plus_boost_constant() {
        let mut scroll = ContinuousScroll::new();
        let t0 = Instant::now();
        let tuning = tuning();
        // First call arms the hold timer; the second is fully saturated.
        scroll.update(t0, 1.0, 0.0, 1.0, &tuning).unwrap();
        let dy = scroll
            .update(t0 + Duration::from_secs(2), 1.0, 0.0, 1.0, &tuning)
            .unwrap();
        assert!((dy - (22.0 + 8.0)).abs() < 1e-3);
    }

    #[test]
    fn sign_flip_resets_acceleration() {
        let mut scroll = ContinuousScroll::new();
        let t0 = Instant::now();
        let tuning = tuning();
        scroll.update(t0, 1.0, 0.0, 0.0, &tuning).unwrap();
        let ramped = scroll
            .update(t0 + Duration::from_millis(600), 1.0, 0.0, 0.0, &tuning)
            .unwrap();
        assert!((ramped - 22.0).abs() < 1e-3);

        let reversed = scroll
            .update(t0 + Duration::from_millis(601), -1.0, 0.0, 0.0, &tuning)
            .unwrap();
        // Fresh hold: minimum speed at full magnitude, downward.
        assert!((reversed + 2.0).abs() < 0.01, "got {reversed}");
    }

    #[test]
    fn idle_resets_hold_and_right_axis_is_fallback() {
        let mut scroll = ContinuousScroll::new();
        let t0 = Instant::now();
        let tuning = tuning();
        scroll.update(t0, 1.0, 0.0, 0.0, &tuning).unwrap();
        assert!(scroll
            .update(t0 + Duration::from_millis(100), 0.05, 0.0, 0.0, &tuning)
            .is_none());

        // After idling, a right-axis hold starts from minimum speed again.
        let dy = scroll
            .update(t0 + Duration::from_millis(700), 0.0, 1.0, 0.0, &tuning)
            .unwrap();
        assert!((dy - 2.0).abs() < 0.01);
    }
}
