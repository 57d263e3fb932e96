//! Input sampling: raw device state to per-frame snapshots.
//!
//! One [`InputFrame`] is produced per animation frame and fed to the engine;
//! everything downstream (edges, hold timers, repeats) is derived from frame
//! comparison, never from device events.

pub mod frame;
pub mod sampler;

pub use frame::{ButtonSample, InputDevice, InputFrame, PadButton};
pub use sampler::{PadSampler, SamplerError};
