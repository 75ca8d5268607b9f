//! The Batcher: coalesces same-turn commit callbacks into one flush.
//!
//! Every state write in a synchronous turn registers a commit callback via
//! [`Batcher::notify`]. The first registration in an idle period opens a
//! queue and schedules exactly one later-turn flush; subsequent
//! registrations append to the open queue. When the flush fires, all
//! queued commits run in FIFO order inside a single
//! [`BatchScope::run_batched`] body, and the Batcher returns to idle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::schedule::Schedule;
use crate::scope::BatchScope;

// ---------------------------------------------------------------------------
// FlushState
// ---------------------------------------------------------------------------

/// A queued commit callback.
pub type Commit = Box<dyn FnOnce() + 'static>;

/// Explicit idle/pending state.
///
/// `Idle` means no flush is scheduled; `Pending` holds the queue for the
/// flush that is. The two transitions are queue creation in
/// [`Batcher::notify`] and the reset at the top of the flush — nowhere
/// else. Between them the queue only grows.
enum FlushState {
    Idle,
    Pending(Vec<Commit>),
}

// ---------------------------------------------------------------------------
// Batcher
// ---------------------------------------------------------------------------

/// Update-coalescing commit queue.
///
/// Constructed once per consumer scope with its scheduler and batch scope
/// injected, then shared (cheap `Rc` clones) across every deferred state
/// slot it serves.
#[derive(Clone)]
pub struct Batcher {
    state: Rc<RefCell<FlushState>>,
    scheduler: Rc<dyn Schedule>,
    scope: Rc<dyn BatchScope>,
}

impl Batcher {
    /// Create an idle batcher over the given scheduler and batch scope.
    pub fn new(scheduler: Rc<dyn Schedule>, scope: Rc<dyn BatchScope>) -> Self {
        Self {
            state: Rc::new(RefCell::new(FlushState::Idle)),
            scheduler,
            scope,
        }
    }

    /// Register `commit` to run at the next flush.
    ///
    /// If idle, opens a new queue and schedules the flush; if a flush is
    /// already pending, appends to its queue. Either way the commit runs
    /// exactly once, on a later turn.
    pub fn notify(&self, commit: impl FnOnce() + 'static) {
        let opened = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                FlushState::Idle => {
                    *state = FlushState::Pending(vec![Box::new(commit)]);
                    true
                }
                FlushState::Pending(queue) => {
                    queue.push(Box::new(commit));
                    false
                }
            }
        };
        if opened {
            let state = Rc::clone(&self.state);
            let scope = Rc::clone(&self.scope);
            self.scheduler
                .schedule(Box::new(move || flush(&state, scope.as_ref())));
        }
    }

    /// A cloneable notify handle for handing to deferred state slots.
    pub fn notifier(&self) -> Notifier {
        Notifier {
            batcher: self.clone(),
        }
    }

    /// Whether a flush is currently scheduled.
    pub fn is_pending(&self) -> bool {
        matches!(&*self.state.borrow(), FlushState::Pending(_))
    }

    /// Number of commits waiting for the next flush.
    pub fn pending_count(&self) -> usize {
        match &*self.state.borrow() {
            FlushState::Idle => 0,
            FlushState::Pending(queue) => queue.len(),
        }
    }
}

/// Execute every queued commit inside one batched-update body.
///
/// The queue is taken and the state reset to `Idle` *before* any commit
/// runs: a panicking commit unwinds out of the flush but can never leave
/// the batcher stuck pending, and a commit that calls `notify` re-entrantly
/// observes idle state and opens a fresh batch on a fresh turn.
fn flush(state: &RefCell<FlushState>, scope: &dyn BatchScope) {
    let mut commits = match std::mem::replace(&mut *state.borrow_mut(), FlushState::Idle) {
        FlushState::Pending(queue) => queue,
        FlushState::Idle => return,
    };
    let mut body = || {
        for commit in commits.drain(..) {
            commit();
        }
    };
    scope.run_batched(&mut body);
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Shared-by-reference notify handle.
///
/// Slots hold one of these rather than the batcher itself; clones all
/// feed the one queue, which stays owned by the batcher.
#[derive(Clone)]
pub struct Notifier {
    batcher: Batcher,
}

impl Notifier {
    /// Register a commit with the owning batcher. See [`Batcher::notify`].
    pub fn notify(&self, commit: impl FnOnce() + 'static) {
        self.batcher.notify(commit);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
