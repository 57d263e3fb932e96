//! The input-to-navigation engine.
//!
//! Translates per-frame controller snapshots into continuous scrolling,
//! accelerating step navigation, an always-consistent active item and
//! semantic feed actions. All mutable session state lives in one
//! [`NavigationEngine`] instance driven by a single frame clock; the
//! [`runtime`] module wraps it in a tokio task.

pub mod calibration;
pub mod dispatch;
pub mod error;
pub mod navigator;
pub mod runtime;
pub mod scroll;
pub mod selection;
pub mod stepper;

pub use calibration::{pick_dominant_axis, AxisAssignment, DominantAxis, StickSlot};
pub use dispatch::{ActionDispatcher, DispatchTuning};
pub use error::EngineError;
pub use navigator::NavigationEngine;
pub use runtime::NavigatorHandle;
pub use scroll::{ContinuousScroll, ScrollTuning};
pub use selection::SelectionTracker;
pub use stepper::{DiscreteStepper, StepTuning};
