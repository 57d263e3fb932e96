//! Gamepad sampler built on gilrs with a statum lifecycle.
//!
//! Unlike an event-driven collector, the navigation engine wants one complete
//! state snapshot per frame: the device exposes no edge interrupts the engine
//! could rely on, so edges are derived downstream by frame comparison. The
//! sampler drains the gilrs event queue each call (gilrs only refreshes its
//! cached state while events are pumped) and then reads the cached axis and
//! button data into an [`InputFrame`].

use chrono::{DateTime, Local};
use gilrs::{Axis, Button, Event, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, info, warn};

use crate::input::frame::{ButtonSample, InputDevice, InputFrame, PadButton};

/// Axis array layout of produced frames. Indices 1 and 3 are the vertical
/// stick axes the default calibration points at.
const AXIS_ORDER: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
];

/// Button array layout of produced frames, matching [`PadButton`] indices.
const BUTTON_ORDER: [Button; PadButton::COUNT] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("Failed to initialize sampler: {0}")]
    InitializationError(String),
}

#[state]
#[derive(Debug, Clone)]
pub enum SamplerState {
    Initializing,
    Sampling,
}

#[machine]
#[derive(Debug)]
pub struct PadSampler<S: SamplerState> {
    // Gilrs context
    gilrs: Gilrs,

    // Gamepad the session is locked to; only one input source is read
    active_gamepad: Option<GamepadId>,

    // Set on the first frame a device produces, for the arrival debug log
    last_seen: Option<DateTime<Local>>,
}

impl PadSampler<Initializing> {
    pub fn create() -> Result<Self, SamplerError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                warn!("Failed to initialize gilrs: {}", e);
                return Err(SamplerError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None, None))
    }

    /// Locks onto the first connected gamepad (if any) and transitions to
    /// the Sampling state. Starting without a gamepad is fine; one plugged
    /// in later is picked up on its first event.
    pub fn initialize(mut self) -> Result<PadSampler<Sampling>, SamplerError> {
        let gamepads: Vec<(GamepadId, String)> = self
            .gilrs
            .gamepads()
            .map(|(id, pad)| (id, pad.name().to_string()))
            .collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, sampling idles until one appears");
        } else {
            info!("Found {} gamepad(s):", gamepads.len());
            for (idx, (id, name)) in gamepads.iter().enumerate() {
                info!("  [{}] ID: {}, Name: {}", idx, id, name);
            }
            let (id, name) = &gamepads[0];
            self.active_gamepad = Some(*id);
            info!("Selected gamepad: {} ({})", name, id);
        }

        Ok(self.transition())
    }
}

impl PadSampler<Sampling> {
    /// Pumps pending gilrs events so cached gamepad state is current.
    fn refresh(&mut self) {
        while let Some(Event { id, .. }) = self.gilrs.next_event() {
            if self.active_gamepad.is_none() {
                info!("Gamepad appeared during session: {}", id);
                self.active_gamepad = Some(id);
            }
        }
    }

    fn connected_id(&mut self) -> Option<GamepadId> {
        if let Some(id) = self.active_gamepad {
            if self.gilrs.connected_gamepad(id).is_some() {
                return Some(id);
            }
            warn!("Active gamepad disconnected: {}", id);
            self.active_gamepad = None;
        }
        // Fall back to any connected pad rather than going dark.
        let next = self.gilrs.gamepads().next().map(|(id, _)| id);
        if let Some(id) = next {
            info!("Switching to gamepad: {}", id);
            self.active_gamepad = Some(id);
        }
        next
    }

    /// Produces a frame from the current device state, or `None` when no
    /// gamepad is connected.
    pub fn snapshot(&mut self) -> Option<InputFrame> {
        self.refresh();
        let id = self.connected_id()?;
        let gamepad = self.gilrs.connected_gamepad(id)?;

        let axes = AXIS_ORDER
            .iter()
            .map(|&axis| {
                let value = gamepad.axis_data(axis).map(|d| d.value()).unwrap_or(0.0);
                // gilrs reports stick-up as positive; the scroll convention
                // is pushing down = positive.
                match axis {
                    Axis::LeftStickY | Axis::RightStickY => -value,
                    _ => value,
                }
            })
            .collect();

        let buttons = BUTTON_ORDER
            .iter()
            .map(|&button| {
                let data = gamepad.button_data(button);
                ButtonSample {
                    pressed: data.map(|d| d.is_pressed()).unwrap_or(false),
                    value: data.map(|d| d.value()).unwrap_or(0.0),
                }
            })
            .collect();

        let now = Local::now();
        if self.last_seen.is_none() {
            debug!("First frame from gamepad at {}", now.format("%H:%M:%S.%3f"));
        }
        self.last_seen = Some(now);

        Some(InputFrame { axes, buttons })
    }
}

impl InputDevice for PadSampler<Sampling> {
    fn sample(&mut self) -> Option<InputFrame> {
        self.snapshot()
    }
}
