//! Settings updates delivered between ticks.

use tokio::sync::mpsc;

use super::SettingsPatch;
use crate::error::{PadmouseError, Result};

/// Message applied to the settings store by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    /// Merge these fields over the current settings and persist
    Patch(SettingsPatch),
    /// Re-read the settings file
    Reload,
}

/// Sending side of the settings update queue.
///
/// Cloneable; every clone feeds the same scheduler.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    tx: mpsc::Sender<SettingsUpdate>,
}

impl SettingsHandle {
    /// Creates a handle and the receiver the scheduler drains.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SettingsUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queues a patch.
    ///
    /// # Errors
    ///
    /// Returns [`PadmouseError::SettingsChannelClosed`] once the scheduler has stopped.
    pub async fn patch(&self, patch: SettingsPatch) -> Result<()> {
        self.send(SettingsUpdate::Patch(patch)).await
    }

    pub async fn reload(&self) -> Result<()> {
        self.send(SettingsUpdate::Reload).await
    }

    async fn send(&self, update: SettingsUpdate) -> Result<()> {
        self.tx
            .send(update)
            .await
            .map_err(|_| PadmouseError::SettingsChannelClosed)
    }
}
