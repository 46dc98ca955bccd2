//! # UI Task Queue
//!
//! Every adapter mutation goes through a [`UiQueue`] so that fields are only
//! written on the UI thread, in the order the engine issued the calls.
//!
//! - From any other thread, [`UiQueue::dispatch`] enqueues and returns
//!   immediately. The task runs at the next [`UiQueue::pump`].
//! - On the UI thread, `dispatch` drains everything already queued and then
//!   runs the task inline, so an observer callback reads its own writes
//!   without reordering anything the engine issued earlier.
//!
//! A field write from another thread is also staged on the field, so the
//! writing thread's getters see it at once while renderers keep reading the
//! applied value until the pump.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread::{self, ThreadId};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::field::ObservableField;

type UiTask = Box<dyn FnOnce() + Send + 'static>;

struct QueueShared {
    ui_thread: ThreadId,
    rx: Mutex<UnboundedReceiver<UiTask>>,
    pending: AtomicUsize,
}

/// Handle to the single UI task queue. Clone freely across threads.
#[derive(Clone)]
pub struct UiQueue {
    tx: UnboundedSender<UiTask>,
    shared: Arc<QueueShared>,
}

impl UiQueue {
    /// Create a queue whose UI thread is the calling thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            shared: Arc::new(QueueShared {
                ui_thread: thread::current().id(),
                rx: Mutex::new(rx),
                pending: AtomicUsize::new(0),
            }),
        }
    }

    /// Whether the caller is on the UI thread.
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.shared.ui_thread
    }

    /// Number of tasks waiting for the next pump.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Run `task` on the UI thread, after every task issued before it.
    pub fn dispatch(&self, task: impl FnOnce() + Send + 'static) {
        if self.is_ui_thread() {
            self.pump();
            task();
            return;
        }
        self.enqueue(Box::new(task));
    }

    fn enqueue(&self, task: UiTask) -> bool {
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        if self.tx.send(task).is_err() {
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            tracing::warn!("ui queue closed; dropping update");
            return false;
        }
        true
    }

    /// Marshal a field write onto the UI thread.
    pub fn assign<T>(&self, field: &ObservableField<T>, value: T)
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        if self.is_ui_thread() {
            self.pump();
            field.set(value);
            return;
        }
        let target = field.clone();
        field.stage(value, |value| {
            self.enqueue(Box::new(move || target.commit(value)))
        });
    }

    /// Apply every queued task in FIFO order. Only the UI thread drains;
    /// elsewhere, or when called from inside a task, this does nothing.
    pub fn pump(&self) -> usize {
        if !self.is_ui_thread() {
            return 0;
        }
        let mut rx = match self.shared.rx.try_lock() {
            Ok(rx) => rx,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return 0,
        };
        let mut applied = 0;
        while let Ok(task) = rx.try_recv() {
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            task();
            applied += 1;
        }
        if applied > 0 {
            tracing::debug!(applied, "applied marshaled ui updates");
        }
        applied
    }
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UiQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiQueue")
            .field("ui_thread", &self.shared.ui_thread)
            .field("pending", &self.pending())
            .finish()
    }
}
