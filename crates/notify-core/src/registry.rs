//! Identity assignment and replace-by-id reconciliation.

use tracing::{debug, warn};

use crate::bubble::{BubbleQueue, Location};
use crate::ports::{HistorySink, Presentation};
use crate::types::{NO_REPLACE_ID, Notification};

/// Outcome of resolving a notification's identity.
#[derive(Debug, Default)]
pub struct Resolution {
    pub id: u32,
    /// A live bubble now shows the new content.
    pub was_replace: bool,
    /// Storage ids of superseded live notifications written to history.
    pub archived: Vec<String>,
    /// Overflow entries dropped in favour of the new arrival.
    pub superseded: Vec<Notification>,
}

/// Allocates notification ids. The counter is process-lifetime and never
/// hands out the same id twice.
#[derive(Debug, Default)]
pub struct Registry {
    counter: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last id handed out or observed.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Assign an id to `notification` and reconcile it with the queue.
    ///
    /// A matching live bubble is updated in place; its old content is
    /// archived regardless of display settings. The returned resolution
    /// carries `was_replace = false` when the caller still has to route the
    /// notification.
    pub fn resolve(
        &mut self,
        notification: &mut Notification,
        queue: &mut BubbleQueue,
        presentation: &dyn Presentation,
        history: &dyn HistorySink,
    ) -> Resolution {
        if notification.replaces_id == NO_REPLACE_ID {
            self.counter += 1;
            notification.id = self.counter;
            notification.replaces_id = self.counter;
            return Resolution {
                id: self.counter,
                ..Resolution::default()
            };
        }

        let replaces_id = notification.replaces_id;
        notification.id = replaces_id;
        self.counter = self.counter.max(replaces_id);
        let mut resolution = Resolution {
            id: replaces_id,
            ..Resolution::default()
        };

        match queue.locate(replaces_id, &notification.app_name) {
            Location::Live(_) => {
                for index in queue.live_matches(replaces_id, &notification.app_name) {
                    let old = queue.replace_at(presentation, index, notification.clone());
                    match history.add_one(&old) {
                        Ok(storage_id) => resolution.archived.push(storage_id),
                        Err(e) => warn!(id = old.id, error = %e, "failed to archive replaced notification"),
                    }
                    resolution.was_replace = true;
                }
                resolution.superseded =
                    queue.remove_overflow_matching(replaces_id, &notification.app_name);
                debug!(id = replaces_id, app = %notification.app_name, "replaced live bubble");
            }
            Location::Overflow(_) => {
                resolution.superseded =
                    queue.remove_overflow_matching(replaces_id, &notification.app_name);
                debug!(id = replaces_id, app = %notification.app_name, "dropped stale overflow entry");
            }
            Location::Absent => {}
        }
        resolution
    }
}
