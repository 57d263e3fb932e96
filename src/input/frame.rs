//! Per-frame input snapshot types.

/// Standard-mapping gamepad buttons, indexed as the frame's button array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadButton {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LeftBumper = 4,
    RightBumper = 5,
    LeftTrigger = 6,
    RightTrigger = 7,
    View = 8,
    Menu = 9,
    LeftStick = 10,
    RightStick = 11,
    DPadUp = 12,
    DPadDown = 13,
    DPadLeft = 14,
    DPadRight = 15,
}

impl PadButton {
    pub const COUNT: usize = 16;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PadButton::A),
            1 => Some(PadButton::B),
            2 => Some(PadButton::X),
            3 => Some(PadButton::Y),
            4 => Some(PadButton::LeftBumper),
            5 => Some(PadButton::RightBumper),
            6 => Some(PadButton::LeftTrigger),
            7 => Some(PadButton::RightTrigger),
            8 => Some(PadButton::View),
            9 => Some(PadButton::Menu),
            10 => Some(PadButton::LeftStick),
            11 => Some(PadButton::RightStick),
            12 => Some(PadButton::DPadUp),
            13 => Some(PadButton::DPadDown),
            14 => Some(PadButton::DPadLeft),
            15 => Some(PadButton::DPadRight),
            _ => None,
        }
    }
}

/// Pressed flag and analog value of one button for one sampling tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ButtonSample {
    pub pressed: bool,
    pub value: f32,
}

/// Snapshot of the full device state for one sampling tick.
///
/// Ephemeral: frames are compared against the previous one for edge
/// detection and then dropped. Devices exposing fewer axes or buttons than
/// expected are tolerated; missing entries read as neutral.
#[derive(Clone, Debug, Default)]
pub struct InputFrame {
    pub axes: Vec<f32>,
    pub buttons: Vec<ButtonSample>,
}

impl InputFrame {
    /// Axis value at `index`, or `0.0` when the device has fewer axes.
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    pub fn pressed(&self, button: PadButton) -> bool {
        self.buttons
            .get(button.index())
            .map(|b| b.pressed)
            .unwrap_or(false)
    }

    pub fn button_value(&self, button: PadButton) -> f32 {
        self.buttons
            .get(button.index())
            .map(|b| b.value)
            .unwrap_or(0.0)
    }

    /// Pressed states normalized to the full button range, for edge
    /// comparison against the previous frame.
    pub fn pressed_mask(&self) -> Vec<bool> {
        (0..PadButton::COUNT)
            .map(|i| self.buttons.get(i).map(|b| b.pressed).unwrap_or(false))
            .collect()
    }
}

/// Polled input source. `None` when no device is connected.
pub trait InputDevice {
    fn sample(&mut self) -> Option<InputFrame>;
}
