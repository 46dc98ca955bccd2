//! # Observer Slot
//!
//! Each adapter holds exactly one [`ObserverSlot`]. The slot keeps a weak
//! reference, so the engine alone decides how long its observer lives.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// Weak, replaceable reference to the one observer of a screen.
pub struct ObserverSlot<O: ?Sized> {
    inner: Arc<RwLock<Option<Weak<O>>>>,
}

impl<O: ?Sized> Clone for ObserverSlot<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: ?Sized> Default for ObserverSlot<O> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }
}

impl<O: ?Sized> fmt::Debug for ObserverSlot<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<O: ?Sized> ObserverSlot<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever observer was attached. The displaced observer is
    /// not told.
    pub fn attach(&self, observer: &Arc<O>) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::downgrade(observer));
    }

    /// Whether a live observer is attached.
    pub fn is_attached(&self) -> bool {
        self.upgrade().is_some()
    }

    fn upgrade(&self) -> Option<Arc<O>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Deliver an event to the attached observer. Without one (never
    /// attached, or already dropped by the engine) this is a no-op.
    pub fn notify(&self, event: &'static str, deliver: impl FnOnce(&O)) -> bool {
        // The lock is released before delivery so the observer may re-attach.
        match self.upgrade() {
            Some(observer) => {
                tracing::debug!(event, "notifying observer");
                deliver(&observer);
                true
            }
            None => {
                tracing::trace!(event, "no observer attached");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Clicks: Send + Sync {
        fn clicked(&self);
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Clicks for Counter {
        fn clicked(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Counter {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_notify_without_observer_is_a_no_op() {
        let slot: ObserverSlot<dyn Clicks> = ObserverSlot::new();
        assert!(!slot.notify("click", |o| o.clicked()));
    }

    #[test]
    fn test_attach_replaces_previous_observer() {
        let slot: ObserverSlot<dyn Clicks> = ObserverSlot::new();
        let first = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());
        let first_dyn: Arc<dyn Clicks> = first.clone();
        let second_dyn: Arc<dyn Clicks> = second.clone();

        slot.attach(&first_dyn);
        slot.notify("click", |o| o.clicked());
        slot.attach(&second_dyn);
        slot.notify("click", |o| o.clicked());
        slot.notify("click", |o| o.clicked());

        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 2);
    }

    #[test]
    fn test_slot_does_not_keep_observer_alive() {
        let slot: ObserverSlot<dyn Clicks> = ObserverSlot::new();
        let observer: Arc<dyn Clicks> = Arc::new(Counter::default());
        slot.attach(&observer);
        assert!(slot.is_attached());

        drop(observer);
        assert!(!slot.is_attached());
        assert!(!slot.notify("click", |o| o.clicked()));
    }

    #[test]
    fn test_clones_see_later_attach() {
        let slot: ObserverSlot<dyn Clicks> = ObserverSlot::new();
        let captured = slot.clone();
        let observer = Arc::new(Counter::default());
        let observer_dyn: Arc<dyn Clicks> = observer.clone();

        slot.attach(&observer_dyn);
        captured.notify("click", |o| o.clicked());
        assert_eq!(observer.count(), 1);
    }
}
