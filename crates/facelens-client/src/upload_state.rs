//! Upload-in-progress tracking.
//!
//! At most one upload runs per client. [`UploadGate::begin`] is the only way
//! into [`UploadState::Uploading`]; dropping the returned permit is the only
//! way back, so every exit path (success, error, panic, cancellation)
//! returns the gate to idle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
}

#[derive(Debug, Clone, Default)]
pub struct UploadGate {
    uploading: Arc<AtomicBool>,
}

impl UploadGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UploadState {
        if self.uploading.load(Ordering::Acquire) {
            UploadState::Uploading
        } else {
            UploadState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state() == UploadState::Uploading
    }

    /// Move to `Uploading`, failing with [`ClientError::Busy`] if an upload
    /// is already running.
    pub fn begin(&self) -> ClientResult<UploadPermit> {
        self.uploading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;

        Ok(UploadPermit {
            uploading: Arc::clone(&self.uploading),
        })
    }
}

/// Held for the duration of one upload.
#[derive(Debug)]
pub struct UploadPermit {
    uploading: Arc<AtomicBool>,
}

impl Drop for UploadPermit {
    fn drop(&mut self) {
        self.uploading.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_permit() {
        let gate = UploadGate::new();
        assert_eq!(gate.state(), UploadState::Idle);

        let permit = gate.begin().unwrap();
        assert_eq!(gate.state(), UploadState::Uploading);
        assert!(matches!(gate.begin(), Err(ClientError::Busy)));

        drop(permit);
        assert_eq!(gate.state(), UploadState::Idle);
        assert!(gate.begin().is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = UploadGate::new();
        let other = gate.clone();
        let _permit = gate.begin().unwrap();
        assert!(other.is_busy());
    }

    #[tokio::test]
    async fn test_released_when_task_fails() {
        let gate = UploadGate::new();
        let task_gate = gate.clone();

        let result = tokio::spawn(async move {
            let _permit = task_gate.begin()?;
            Err::<(), ClientError>(ClientError::Status(500))
        })
        .await
        .unwrap();

        assert!(result.is_err());
        assert_eq!(gate.state(), UploadState::Idle);
    }
}
