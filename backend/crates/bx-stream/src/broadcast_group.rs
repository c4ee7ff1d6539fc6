use crate::subscriber_queue::{PushOutcome, SubscriberQueue};
use crate::{Metrics, OverflowPolicy, SendReport, SubscriberHandle};

use bx_config::StreamConfig;
use bx_core::EventEnvelope;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;
use log::{debug, info};
use tokio::time::Instant;

/// Message type carried by every group; receivers share one allocation.
pub type GroupMessage = Arc<EventEnvelope>;

/// In-process multicast group.
///
/// Each subscriber owns a bounded FIFO queue. `send` delivers to the set of
/// subscribers present when it starts: a subscriber that joins afterwards
/// never sees the message, one that was present sees it at most once.
#[derive(Clone)]
pub struct BroadcastGroup {
    inner: Arc<GroupInner>,
}

struct Registry {
    subscribers: HashMap<u64, Arc<SubscriberQueue>>,
    closed: bool,
}

pub(crate) struct GroupInner {
    name: String,
    capacity: usize,
    policy: OverflowPolicy,
    next_id: AtomicU64,
    registry: RwLock<Registry>,
    metrics: Metrics,
}

impl GroupInner {
    // The registry is only mutated by insert/remove, so a poisoned lock is
    // still structurally sound
    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Drop a subscriber from the registry. Called once, from the handle's Drop.
    pub(crate) fn remove(&self, id: u64) {
        let remaining = {
            let mut registry = self.write();
            if let Some(queue) = registry.subscribers.remove(&id) {
                queue.close();
            }
            registry.subscribers.len()
        };

        self.metrics.group_subscribers(&self.name, remaining);
        debug!(
            "Subscriber {} left group {} ({} remaining)",
            id, self.name, remaining
        );
    }
}

impl BroadcastGroup {
    pub fn new(name: impl Into<String>, capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            inner: Arc::new(GroupInner {
                name: name.into(),
                capacity: capacity.max(1),
                policy,
                next_id: AtomicU64::new(1),
                registry: RwLock::new(Registry {
                    subscribers: HashMap::new(),
                    closed: false,
                }),
                metrics: Metrics::new(),
            }),
        }
    }

    pub fn from_config(name: impl Into<String>, config: &StreamConfig) -> Self {
        Self::new(name, config.queue_capacity, OverflowPolicy::from(config))
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.inner.policy
    }

    /// Register a new subscriber with an empty queue.
    /// Joining a closed group yields a handle whose `recv` returns `None`.
    pub fn join(&self) -> SubscriberHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let queue = Arc::new(SubscriberQueue::new(self.inner.capacity));

        let count = {
            let mut registry = self.inner.write();
            if registry.closed {
                queue.close();
            } else {
                registry.subscribers.insert(id, Arc::clone(&queue));
            }
            registry.subscribers.len()
        };

        self.inner.metrics.group_subscribers(&self.inner.name, count);
        debug!(
            "Subscriber {} joined group {} ({} total)",
            id, self.inner.name, count
        );

        SubscriberHandle::new(id, queue, Arc::clone(&self.inner))
    }

    /// Deregister a subscriber. Consuming the handle makes a second leave
    /// impossible; dropping the handle has the same effect.
    pub fn leave(&self, handle: SubscriberHandle) {
        drop(handle);
    }

    /// Deliver `message` to every current subscriber according to the
    /// overflow policy. Never fails; losses are reported in the result.
    pub async fn send(&self, message: impl Into<GroupMessage>) -> SendReport {
        let message = message.into();

        // Snapshot so no lock is held while pushing or waiting
        let queues: Vec<Arc<SubscriberQueue>> =
            self.inner.read().subscribers.values().cloned().collect();

        let mut report = SendReport {
            subscribers: queues.len(),
            ..SendReport::default()
        };

        let evict_oldest = self.inner.policy == OverflowPolicy::DropOldest;
        let mut full = Vec::new();

        for queue in &queues {
            match queue.try_push(&message, evict_oldest) {
                PushOutcome::Queued => report.delivered += 1,
                PushOutcome::QueuedEvicting => {
                    report.delivered += 1;
                    report.dropped += 1;
                }
                PushOutcome::Full => full.push(queue),
                PushOutcome::Closed => {}
            }
        }

        if !full.is_empty() {
            match self.inner.policy {
                OverflowPolicy::BoundedWait(wait) => {
                    // All slow subscribers share one deadline
                    let deadline = Instant::now() + wait;
                    let outcomes =
                        join_all(full.iter().map(|queue| queue.push_until(&message, deadline)))
                            .await;

                    for outcome in outcomes {
                        match outcome {
                            PushOutcome::Queued | PushOutcome::QueuedEvicting => {
                                report.delivered += 1
                            }
                            PushOutcome::Full => report.dropped += 1,
                            PushOutcome::Closed => {}
                        }
                    }
                }
                _ => report.dropped += full.len(),
            }
        }

        if report.dropped > 0 {
            self.inner.metrics.events_dropped(&self.inner.name, report.dropped);
            debug!(
                "Group {} dropped {} message(s) for slow subscribers",
                self.inner.name, report.dropped
            );
        }

        report
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.read().subscribers.len()
    }

    /// Close the group: every queue is closed (receivers drain then see
    /// `None`) and later joins get closed handles.
    pub fn close(&self) {
        let queues: Vec<Arc<SubscriberQueue>> = {
            let mut registry = self.inner.write();
            registry.closed = true;
            registry.subscribers.values().cloned().collect()
        };

        for queue in &queues {
            queue.close();
        }

        info!(
            "Closed group {} ({} subscribers notified)",
            self.inner.name,
            queues.len()
        );
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().closed
    }
}
