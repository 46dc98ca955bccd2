//! # Render Scheduler
//!
//! The [`Reactor`] is the explicit dirty/redraw boundary between
//! [`ObservableField`](super::ObservableField)s and the renderers that read
//! them.
//!
//! ## Dependency tracking
//!
//! A renderer runs inside [`Reactor::track`], which marks its
//! [`RenderScope`] as active on the current thread. Every field read during
//! that call is recorded as a dependency of the scope. Re-tracking a scope
//! first forgets its previous reads, so dependencies always reflect the most
//! recent render.
//!
//! ## Coalescing
//!
//! A field write marks every dependent scope dirty. Dirty scopes accumulate
//! until the render loop calls [`Reactor::begin_pass`], which takes the whole
//! set at once: any number of writes between two passes cost one pass.

use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::screens::ScreenId;

/// Identity of a single observable field, unique per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A unit of rendering whose field reads are tracked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderScope {
    /// The window composer (visibility and phase decisions).
    Window,
    /// One screen's renderer.
    Screen(ScreenId),
}

/// The scope being rendered on this thread, tagged with its reactor so a
/// field of another window read inside it is not tracked.
#[derive(Clone, Copy)]
struct ActiveScope {
    reactor: usize,
    scope: RenderScope,
}

thread_local! {
    static ACTIVE_SCOPE: Cell<Option<ActiveScope>> = const { Cell::new(None) };
}

/// Restores the previously active scope even if the renderer panics.
struct ScopeGuard {
    previous: Option<ActiveScope>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        ACTIVE_SCOPE.with(|active| active.set(self.previous));
    }
}

#[derive(Default)]
struct ReactorState {
    dependents: HashMap<FieldId, BTreeSet<RenderScope>>,
    reads: HashMap<RenderScope, BTreeSet<FieldId>>,
    dirty: BTreeSet<RenderScope>,
    forced: bool,
    passes: u64,
}

/// The set of scopes a render pass must re-evaluate.
#[derive(Debug, Clone)]
pub struct RenderPass {
    number: u64,
    dirty: BTreeSet<RenderScope>,
    forced: bool,
}

impl RenderPass {
    /// Sequence number of this pass, starting at 1.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Whether `scope` must be re-rendered in this pass.
    pub fn covers(&self, scope: RenderScope) -> bool {
        self.forced || self.dirty.contains(&scope)
    }

    /// Whether every scope is being re-rendered (the first pass only).
    pub fn is_forced(&self) -> bool {
        self.forced
    }
}

/// Dependency graph and dirty set shared by every field of one window.
pub struct Reactor {
    state: Mutex<ReactorState>,
}

impl Reactor {
    /// Create a reactor whose first pass re-renders everything.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ReactorState {
                forced: true,
                ..ReactorState::default()
            }),
        })
    }

    fn key(&self) -> usize {
        std::ptr::from_ref(self) as usize
    }

    fn lock(&self) -> MutexGuard<'_, ReactorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `render` with `scope` active, replacing the scope's dependencies
    /// with the fields it reads this time.
    pub fn track<R>(&self, scope: RenderScope, render: impl FnOnce() -> R) -> R {
        self.forget(scope);
        let active = ActiveScope {
            reactor: self.key(),
            scope,
        };
        let previous = ACTIVE_SCOPE.with(|cell| cell.replace(Some(active)));
        let _guard = ScopeGuard { previous };
        render()
    }

    /// Drop every dependency of `scope`, e.g. when its screen is unmounted.
    pub fn forget(&self, scope: RenderScope) {
        let mut state = self.lock();
        if let Some(fields) = state.reads.remove(&scope) {
            for field in fields {
                if let Some(scopes) = state.dependents.get_mut(&field) {
                    scopes.remove(&scope);
                    if scopes.is_empty() {
                        state.dependents.remove(&field);
                    }
                }
            }
        }
    }

    /// Record a read of `field` by this reactor's active scope. Returns
    /// whether the read was tracked.
    pub(crate) fn record_read(&self, field: FieldId) -> bool {
        let scope = match ACTIVE_SCOPE.with(Cell::get) {
            Some(active) if active.reactor == self.key() => active.scope,
            _ => return false,
        };
        let mut state = self.lock();
        state.dependents.entry(field).or_default().insert(scope);
        state.reads.entry(scope).or_default().insert(field);
        true
    }

    pub(crate) fn invalidate(&self, field: FieldId) {
        let mut state = self.lock();
        let Some(scopes) = state.dependents.get(&field).cloned() else {
            return;
        };
        tracing::trace!(?field, ?scopes, "field invalidated dependents");
        state.dirty.extend(scopes);
    }

    /// Whether a render pass is pending.
    pub fn needs_render(&self) -> bool {
        let state = self.lock();
        state.forced || !state.dirty.is_empty()
    }

    /// Whether `scope` has been dirtied since the last pass.
    pub fn is_dirty(&self, scope: RenderScope) -> bool {
        self.lock().dirty.contains(&scope)
    }

    /// Take the pending dirty set and start a new pass.
    pub fn begin_pass(&self) -> RenderPass {
        let mut state = self.lock();
        state.passes += 1;
        let pass = RenderPass {
            number: state.passes,
            dirty: std::mem::take(&mut state.dirty),
            forced: std::mem::replace(&mut state.forced, false),
        };
        tracing::trace!(pass = pass.number, forced = pass.forced, dirty = ?pass.dirty, "render pass");
        pass
    }

    /// Number of passes started so far.
    pub fn passes(&self) -> u64 {
        self.lock().passes
    }

    /// Whether `scope` currently depends on `field`.
    pub fn depends_on(&self, scope: RenderScope, field: FieldId) -> bool {
        self.lock()
            .dependents
            .get(&field)
            .is_some_and(|scopes| scopes.contains(&scope))
    }
}
