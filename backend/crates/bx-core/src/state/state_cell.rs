//! Single-writer, multi-reader process state.
//!
//! A cell is created as a `(StateWriter, StateReader)` pair. The writer is not
//! `Clone`, so exactly one task owns updates; readers are cheap to clone and
//! always observe the latest published value together with its version.

use tokio::sync::watch;

/// Value tagged with the number of publishes that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Namespace for constructing cells.
pub struct StateCell;

impl StateCell {
    /// Create a cell holding `initial` at version 0.
    pub fn new<T: Clone>(initial: T) -> (StateWriter<T>, StateReader<T>) {
        let (tx, rx) = watch::channel(Versioned {
            version: 0,
            value: initial,
        });
        (StateWriter { tx }, StateReader { rx })
    }
}

pub struct StateWriter<T> {
    tx: watch::Sender<Versioned<T>>,
}

impl<T: Clone> StateWriter<T> {
    /// Replace the value and bump the version. Returns the new version.
    pub fn publish(&self, value: T) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|current| {
            current.version += 1;
            current.value = value;
            version = current.version;
        });
        version
    }

    pub fn current(&self) -> Versioned<T> {
        self.tx.borrow().clone()
    }

    pub fn reader(&self) -> StateReader<T> {
        StateReader {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Clone)]
pub struct StateReader<T> {
    rx: watch::Receiver<Versioned<T>>,
}

impl<T: Clone> StateReader<T> {
    pub fn get(&self) -> T {
        self.rx.borrow().value.clone()
    }

    pub fn snapshot(&self) -> Versioned<T> {
        self.rx.borrow().clone()
    }

    pub fn version(&self) -> u64 {
        self.rx.borrow().version
    }

    /// Wait for the next publish. Returns `false` once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
