use crate::broadcast_group::GroupMessage;

use std::collections::VecDeque;
use std::pin::pin;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;
use tokio::time::{Instant, timeout_at};

/// Result of placing one message in one subscriber queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    Queued,
    /// Queued after evicting the oldest entry
    QueuedEvicting,
    /// Queue full, message discarded
    Full,
    /// Subscriber already left
    Closed,
}

struct QueueState {
    items: VecDeque<GroupMessage>,
    closed: bool,
}

/// Bounded FIFO owned by exactly one subscriber.
pub(crate) struct SubscriberQueue {
    state: Mutex<QueueState>,
    capacity: usize,
    readable: Notify,
    writable: Notify,
}

impl SubscriberQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity.min(64)),
                closed: false,
            }),
            capacity: capacity.max(1),
            readable: Notify::new(),
            writable: Notify::new(),
        }
    }

    // Queue state stays consistent on panic, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn try_push(&self, message: &GroupMessage, evict_oldest: bool) -> PushOutcome {
        let outcome = {
            let mut state = self.lock();
            if state.closed {
                return PushOutcome::Closed;
            }

            if state.items.len() < self.capacity {
                state.items.push_back(message.clone());
                PushOutcome::Queued
            } else if evict_oldest {
                state.items.pop_front();
                state.items.push_back(message.clone());
                PushOutcome::QueuedEvicting
            } else {
                PushOutcome::Full
            }
        };

        if outcome != PushOutcome::Full {
            self.readable.notify_one();
        }
        outcome
    }

    /// Push, waiting for room until `deadline`.
    pub(crate) async fn push_until(&self, message: &GroupMessage, deadline: Instant) -> PushOutcome {
        loop {
            let mut notified = pin!(self.writable.notified());
            notified.as_mut().enable();

            match self.try_push(message, false) {
                PushOutcome::Full => {}
                outcome => return outcome,
            }

            if timeout_at(deadline, notified).await.is_err() {
                return PushOutcome::Full;
            }
        }
    }

    pub(crate) fn try_recv(&self) -> Option<GroupMessage> {
        let message = self.lock().items.pop_front();
        if message.is_some() {
            self.writable.notify_waiters();
        }
        message
    }

    /// Next message in FIFO order; `None` once closed and drained.
    /// Cancel safe: a message is only removed in the poll that returns it.
    pub(crate) async fn recv(&self) -> Option<GroupMessage> {
        loop {
            let mut notified = pin!(self.readable.notified());
            notified.as_mut().enable();

            let popped = {
                let mut state = self.lock();
                state.items.pop_front().ok_or(state.closed)
            };

            match popped {
                Ok(message) => {
                    self.writable.notify_waiters();
                    return Some(message);
                }
                Err(true) => return None,
                Err(false) => notified.await,
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub(crate) fn close(&self) {
        self.lock().closed = true;
        self.readable.notify_one();
        self.writable.notify_waiters();
    }
}
