use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Holds the background sweeper task of a repository.
///
/// Cloned together with the repository so every clone can stop the same task.
#[derive(Debug, Clone, Default)]
pub(crate) struct SweeperSlot(Arc<Mutex<Option<JoinHandle<()>>>>);

impl SweeperSlot {
    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Spawns the task produced by `spawn` unless one is still running.
    ///
    /// Returns false if a sweeper was already active.
    pub(crate) fn start<F>(&self, spawn: F) -> bool
    where
        F: FnOnce() -> JoinHandle<()>,
    {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }
        *slot = Some(spawn());
        true
    }

    /// Aborts the running sweeper, if any.
    ///
    /// Dropping the aborted task drops its deletion sender, which ends the
    /// cache listener on the other side of the channel.
    pub(crate) fn stop(&self) -> bool {
        match self.lock().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}
