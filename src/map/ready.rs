//! Actions deferred until the map document is available.

use std::fmt;

use tracing::{debug, warn};

use super::{DippyMap, MapError};

/// A deferred map operation.
pub type ReadyAction = Box<dyn for<'m, 'a> FnOnce(&'m mut DippyMap<'a>) -> Result<(), MapError>>;

/// Queue of actions registered before the map is loaded.
#[derive(Default)]
pub struct ReadyQueue {
    pending: Vec<ReadyAction>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to run once the map is ready.
    pub fn add_ready_action<F>(&mut self, action: F)
    where
        F: for<'m, 'a> FnOnce(&'m mut DippyMap<'a>) -> Result<(), MapError> + 'static,
    {
        self.pending.push(Box::new(action));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Runs every queued action in registration order.
    ///
    /// A failing action does not stop the rest; the first failure is
    /// returned once the queue is drained.
    pub fn mark_ready(&mut self, map: &mut DippyMap<'_>) -> Result<(), MapError> {
        let actions = std::mem::take(&mut self.pending);
        debug!(count = actions.len(), "running ready actions");
        let mut first_err = None;
        for (i, action) in actions.into_iter().enumerate() {
            if let Err(e) = action(&mut *map) {
                warn!(index = i, error = %e, "ready action failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for ReadyQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyQueue")
            .field("pending", &self.pending.len())
            .finish()
    }
}
