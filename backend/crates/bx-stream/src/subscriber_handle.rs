use crate::broadcast_group::{GroupInner, GroupMessage};
use crate::subscriber_queue::SubscriberQueue;

use std::sync::Arc;

/// Membership in a `BroadcastGroup`.
///
/// The handle is the only way to read the subscriber's queue. Dropping it
/// leaves the group exactly once, whichever path the owner exits through.
pub struct SubscriberHandle {
    id: u64,
    queue: Arc<SubscriberQueue>,
    group: Arc<GroupInner>,
}

impl SubscriberHandle {
    pub(crate) fn new(id: u64, queue: Arc<SubscriberQueue>, group: Arc<GroupInner>) -> Self {
        Self { id, queue, group }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn group_name(&self) -> &str {
        self.group.name()
    }

    /// Wait for the next message. `None` once the group is closed and the
    /// queue drained. Cancel safe.
    pub async fn recv(&self) -> Option<GroupMessage> {
        self.queue.recv().await
    }

    pub fn try_recv(&self) -> Option<GroupMessage> {
        self.queue.try_recv()
    }

    /// Messages waiting in this subscriber's queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.group.remove(self.id);
    }
}

impl std::fmt::Debug for SubscriberHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberHandle")
            .field("id", &self.id)
            .field("group", &self.group.name())
            .finish()
    }
}
