//! # Observable Field
//!
//! A single reactively observable value cell. Handles are cheap to clone and
//! share the same storage, so an adapter and the bound controls of a rendered
//! view all point at one value.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::scheduler::{FieldId, Reactor};

/// Writes issued off the UI thread that the queue has not applied yet.
struct Staged<T> {
    latest: Option<T>,
    outstanding: usize,
}

struct FieldInner<T> {
    id: FieldId,
    value: RwLock<T>,
    staged: Mutex<Staged<T>>,
    version: AtomicU64,
    reactor: Arc<Reactor>,
}

/// A value cell whose reads are tracked by the [`Reactor`] and whose writes
/// invalidate the renderers that read it.
pub struct ObservableField<T> {
    inner: Arc<FieldInner<T>>,
}

/// Boolean cell (visibility, flags, enabled states).
pub type BoolField = ObservableField<bool>;
/// String cell (text fields, labels, selections).
pub type StringField = ObservableField<String>;
/// Ordered list of labels (choice lists).
pub type ListField = ObservableField<Vec<String>>;

impl<T> Clone for ObservableField<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ObservableField")
            .field("id", &self.inner.id)
            .field("value", &*value)
            .finish()
    }
}

impl<T: Clone + PartialEq> ObservableField<T> {
    pub fn new(reactor: &Arc<Reactor>, initial: T) -> Self {
        Self {
            inner: Arc::new(FieldInner {
                id: FieldId::next(),
                value: RwLock::new(initial),
                staged: Mutex::new(Staged {
                    latest: None,
                    outstanding: 0,
                }),
                version: AtomicU64::new(0),
                reactor: Arc::clone(reactor),
            }),
        }
    }

    pub fn id(&self) -> FieldId {
        self.inner.id
    }

    /// Number of value-changing writes applied so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Current value. Inside a render scope this subscribes the scope and
    /// reads only applied writes; elsewhere the latest issued write wins,
    /// even if the UI thread has not applied it yet.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        if !self.inner.reactor.record_read(self.inner.id) {
            let staged = self.lock_staged();
            if let Some(latest) = &staged.latest {
                return read(latest);
            }
        }
        let value = self
            .inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        read(&value)
    }

    /// Store `value`. Equal values are ignored; returns whether it changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if *current == value {
                return false;
            }
            *current = value;
            self.inner.version.fetch_add(1, Ordering::AcqRel);
        }
        self.inner.reactor.invalidate(self.inner.id);
        true
    }

    fn lock_staged(&self) -> MutexGuard<'_, Staged<T>> {
        self.inner
            .staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `value` as issued but not yet applied. `enqueue` hands the
    /// write to the UI queue and runs under the staging lock, so staging
    /// order and queue order agree.
    pub(crate) fn stage(&self, value: T, enqueue: impl FnOnce(T) -> bool) {
        let mut staged = self.lock_staged();
        if enqueue(value.clone()) {
            staged.latest = Some(value);
            staged.outstanding += 1;
        }
    }

    /// Apply a staged write on the UI thread.
    pub(crate) fn commit(&self, value: T) {
        self.set(value);
        let mut staged = self.lock_staged();
        staged.outstanding = staged.outstanding.saturating_sub(1);
        if staged.outstanding == 0 {
            staged.latest = None;
        }
    }
}

impl StringField {
    /// Select `label` if it is one of `choices`; otherwise leave the
    /// selection untouched. Returns whether `label` was accepted.
    pub fn select_from(&self, choices: &[String], label: &str) -> bool {
        if !choices.iter().any(|choice| choice == label) {
            tracing::debug!(label, "ignoring selection of a label not in the list");
            return false;
        }
        self.set(label.to_string());
        true
    }
}
