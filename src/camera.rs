//! Camera capability used by the face capture flow
//!
//! The device itself lives on the client. This module only models the
//! contract: try an ordered list of constraint sets, stop at the first
//! stream, give up immediately when permission is denied.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a stream could not be acquired
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera device found")]
    NoDevice,

    #[error("camera is in use by another application")]
    DeviceBusy,

    #[error("camera does not support the requested settings")]
    Unsupported,

    #[error("camera request cancelled")]
    Cancelled,
}

impl CameraError {
    /// Whether the next constraint set is worth trying
    pub fn is_retryable(self) -> bool {
        !matches!(self, CameraError::PermissionDenied | CameraError::Cancelled)
    }

    /// What the user should do about it
    pub fn remediation(self) -> &'static str {
        match self {
            CameraError::PermissionDenied => {
                "Camera permission denied. Please allow camera access in your browser settings."
            }
            CameraError::NoDevice => {
                "No camera found. Please ensure your device has a working camera."
            }
            CameraError::DeviceBusy => {
                "Camera is already in use by another application. Please close other apps and try again."
            }
            CameraError::Unsupported => {
                "Camera does not support the required settings. Please try again or use another device."
            }
            CameraError::Cancelled => "Camera request was cancelled.",
        }
    }
}

/// One set of stream constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    /// Prefer the front-facing camera
    pub facing_user: bool,
    pub ideal_width: Option<u32>,
    pub ideal_height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl CameraConstraints {
    /// Any video source
    pub fn basic() -> Self {
        Self {
            facing_user: false,
            ideal_width: None,
            ideal_height: None,
            max_width: None,
            max_height: None,
        }
    }

    /// Front camera, no size hints
    pub fn front() -> Self {
        Self {
            facing_user: true,
            ..Self::basic()
        }
    }

    /// Front camera at a small resolution, the most widely accepted request
    pub fn front_low_res() -> Self {
        Self {
            facing_user: true,
            ideal_width: Some(320),
            ideal_height: Some(240),
            max_width: Some(640),
            max_height: Some(480),
        }
    }

    /// Order in which constraint sets are attempted
    pub fn fallback_sequence() -> Vec<Self> {
        vec![Self::front_low_res(), Self::basic(), Self::front()]
    }
}

/// Something that can open a video stream
#[async_trait]
pub trait CameraDevice: Send + Sync {
    type Stream: Send;

    async fn open(&self, constraints: &CameraConstraints) -> Result<Self::Stream, CameraError>;
}

/// Try each constraint set in order until a stream opens.
///
/// Returns the last failure if all attempts fail, `PermissionDenied` as soon
/// as it is seen, and `Cancelled` once `cancel` completes.
pub async fn acquire_stream<D, F>(
    device: &D,
    sequence: &[CameraConstraints],
    cancel: F,
) -> Result<D::Stream, CameraError>
where
    D: CameraDevice + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(cancel);
    let mut last_error = CameraError::Unsupported;

    for (attempt, constraints) in sequence.iter().enumerate() {
        let result = tokio::select! {
            biased;
            _ = &mut cancel => return Err(CameraError::Cancelled),
            result = device.open(constraints) => result,
        };

        match result {
            Ok(stream) => {
                tracing::debug!(attempt = attempt + 1, "Camera stream acquired");
                return Ok(stream);
            }
            Err(e) if !e.is_retryable() => {
                tracing::warn!(attempt = attempt + 1, error = %e, "Camera access refused");
                return Err(e);
            }
            Err(e) => {
                tracing::debug!(attempt = attempt + 1, error = %e, "Camera constraint set failed");
                last_error = e;
            }
        }
    }

    Err(last_error)
}
