//! Stable-identity callback wrapper.
//!
//! [`StableFn`] holds the latest closure in a mutable single-owner cell
//! and exposes a fixed wrapper that reads the cell at call time. Clones
//! share identity ([`ptr_eq`](StableFn::ptr_eq)), so a handle passed to a
//! long-lived callback holder keeps working after the behavior behind it
//! is swapped with [`replace`](StableFn::replace).

use std::cell::RefCell;
use std::rc::Rc;

type Slot<A> = RefCell<Option<Box<dyn FnMut(A)>>>;

/// A callable handle with fixed identity and swappable behavior.
pub struct StableFn<A> {
    inner: Rc<Slot<A>>,
}

impl<A> Clone for StableFn<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A> StableFn<A> {
    /// Wrap an initial closure.
    pub fn new(f: impl FnMut(A) + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Some(Box::new(f)))),
        }
    }

    /// Swap in a new closure. Existing clones keep their identity but run
    /// the new behavior from the next call on.
    pub fn replace(&self, f: impl FnMut(A) + 'static) {
        *self.inner.borrow_mut() = Some(Box::new(f));
    }

    /// Invoke the currently stored closure.
    ///
    /// The closure is taken out of the cell while it runs, so a re-entrant
    /// call during execution is a no-op rather than a borrow panic. It is
    /// put back afterwards unless `replace` ran meanwhile.
    pub fn call(&self, arg: A) {
        let Some(mut f) = self.inner.borrow_mut().take() else {
            return;
        };
        f(arg);
        let mut slot = self.inner.borrow_mut();
        if slot.is_none() {
            *slot = Some(f);
        }
    }

    /// Whether two handles share the same underlying cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A> std::fmt::Debug for StableFn<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StableFn")
            .field("cell", &Rc::as_ptr(&self.inner))
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
