//! Step state machines behind the check-in and face capture screens
//!
//! Each flow is a plain enum with a `transition` function so screen logic can
//! be exercised without a renderer.

pub mod face_capture;
pub mod mark;

use thiserror::Error;

pub use face_capture::{CaptureEvent, CaptureStep};
pub use mark::{MarkEvent, MarkOutcome, MarkStep, OutcomeKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event `{event}` is not valid in step `{step}`")]
pub struct TransitionError {
    pub step: &'static str,
    pub event: &'static str,
}
