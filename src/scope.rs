//! Batched-update scope: the boundary to the rendering collaborator.
//!
//! A [`BatchScope`] wraps the body of a flush so that any number of value
//! cell writes inside it produce a single externally observable update
//! cycle. How the host achieves that coalescing is its own business; this
//! crate only requires the higher-order call shape.

use std::cell::Cell;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// BatchScope trait
// ---------------------------------------------------------------------------

/// A scoping construct supplied by the rendering collaborator.
///
/// `run_batched` must invoke `body` exactly once and suppress per-write
/// update propagation inside it, emitting at most one combined
/// notification after the body completes.
pub trait BatchScope {
    /// Run `body` inside one batched-update cycle.
    fn run_batched(&self, body: &mut dyn FnMut());
}

// ---------------------------------------------------------------------------
// DirectScope
// ---------------------------------------------------------------------------

/// Passthrough scope for hosts with no update coalescing of their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectScope;

impl BatchScope for DirectScope {
    fn run_batched(&self, body: &mut dyn FnMut()) {
        body();
    }
}

// ---------------------------------------------------------------------------
// NotifyingScope
// ---------------------------------------------------------------------------

/// Scope that fires one combined-update hook per batch.
///
/// The hook runs exactly once after the body completes, regardless of how
/// many writes the body performed. Hosts hang their "re-derive the
/// presentation now" logic on the hook.
pub struct NotifyingScope {
    on_update: Rc<dyn Fn()>,
    entries: Cell<usize>,
}

impl NotifyingScope {
    /// Create a scope that calls `on_update` once per completed batch.
    pub fn new(on_update: impl Fn() + 'static) -> Self {
        Self {
            on_update: Rc::new(on_update),
            entries: Cell::new(0),
        }
    }

    /// How many batches have run to completion through this scope.
    pub fn batches_run(&self) -> usize {
        self.entries.get()
    }
}

impl BatchScope for NotifyingScope {
    fn run_batched(&self, body: &mut dyn FnMut()) {
        body();
        self.entries.set(self.entries.get() + 1);
        (self.on_update)();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn direct_scope_runs_body() {
        let scope = DirectScope;
        let mut ran = false;
        scope.run_batched(&mut || ran = true);
        assert!(ran);
    }

    #[test]
    fn notifying_scope_fires_hook_after_body() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_hook = log.clone();
        let scope = NotifyingScope::new(move || log_hook.borrow_mut().push("update"));

        let log_body = log.clone();
        scope.run_batched(&mut || log_body.borrow_mut().push("body"));
        assert_eq!(*log.borrow(), vec!["body", "update"]);
    }

    #[test]
    fn notifying_scope_one_hook_per_batch() {
        let updates = Rc::new(Cell::new(0));
        let updates_c = updates.clone();
        let scope = NotifyingScope::new(move || updates_c.set(updates_c.get() + 1));

        // Many writes inside one body: still one notification.
        let writes = Rc::new(Cell::new(0));
        let writes_c = writes.clone();
        scope.run_batched(&mut || {
            for _ in 0..10 {
                writes_c.set(writes_c.get() + 1);
            }
        });
        assert_eq!(writes.get(), 10);
        assert_eq!(updates.get(), 1);
        assert_eq!(scope.batches_run(), 1);

        scope.run_batched(&mut || {});
        assert_eq!(updates.get(), 2);
        assert_eq!(scope.batches_run(), 2);
    }
}
