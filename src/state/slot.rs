//! Deferred state slots: read committed values, write through the batcher.
//!
//! [`create_deferred`] returns a `(read, write)` pair bound to one
//! [`Batcher`](crate::batcher::Batcher) via its [`Notifier`]. Reads always
//! return the last *committed* value; a write never mutates the slot
//! synchronously — it captures its updater and registers a commit callback
//! with the batcher, which applies it during the next flush against the
//! then-current value. N writes in one turn therefore fold sequentially,
//! each seeing the result of the previous commit in the same flush.

use std::fmt;
use std::rc::Rc;

use crate::batcher::Notifier;
use crate::state::cell::ValueCell;
use crate::state::stable::StableFn;

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

/// A pending write: either a literal replacement or a pure function of the
/// old committed value.
pub enum Updater<T> {
    /// Replace the value outright.
    Value(T),
    /// Derive the new value from the current committed one.
    Compute(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Updater<T> {
    /// A literal replacement.
    pub fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// A derivation from the old value.
    pub fn compute(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Self::Compute(Box::new(f))
    }

    /// Resolve against the current committed value.
    pub fn apply(self, current: &T) -> T {
        match self {
            Self::Value(value) => value,
            Self::Compute(f) => f(current),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Updater::Value").field(value).finish(),
            Self::Compute(_) => f.write_str("Updater::Compute(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Slot creation
// ---------------------------------------------------------------------------

/// Create a deferred state slot bound to `notifier` with an initial value.
///
/// Returns a `(read, write)` pair. The pair shares one value cell; both
/// halves are cheaply cloneable.
pub fn create_deferred<T: 'static>(
    notifier: Notifier,
    initial: T,
) -> (ReadDeferred<T>, WriteDeferred<T>) {
    create_deferred_with_cell(notifier, Rc::new(ValueCell::new(initial)))
}

/// Like [`create_deferred`], but over a caller-built [`ValueCell`] — use
/// this to wire the cell's redraw hook to the host.
pub fn create_deferred_with_cell<T: 'static>(
    notifier: Notifier,
    cell: Rc<ValueCell<T>>,
) -> (ReadDeferred<T>, WriteDeferred<T>) {
    let write = StableFn::new(commit_entry(notifier, Rc::clone(&cell)));
    (
        ReadDeferred {
            cell: Rc::clone(&cell),
        },
        WriteDeferred { write, cell },
    )
}

/// The write entry point stored behind the slot's [`StableFn`]: capture
/// the updater and register the commit with the batcher.
fn commit_entry<T: 'static>(
    notifier: Notifier,
    cell: Rc<ValueCell<T>>,
) -> impl FnMut(Updater<T>) + 'static {
    move |updater| {
        let cell = Rc::clone(&cell);
        notifier.notify(move || {
            let next = cell.with(|current| updater.apply(current));
            cell.set(next);
        });
    }
}

// ---------------------------------------------------------------------------
// ReadDeferred
// ---------------------------------------------------------------------------

/// Read-half of a deferred slot: the last committed value only.
pub struct ReadDeferred<T> {
    cell: Rc<ValueCell<T>>,
}

// Manual impl so we don't require T: Clone for the handle itself.
impl<T> Clone for ReadDeferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> ReadDeferred<T> {
    /// Clone out the committed value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.get()
    }

    /// Read the committed value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadDeferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadDeferred")
            .field("cell", &self.cell)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// WriteDeferred
// ---------------------------------------------------------------------------

/// Write-half of a deferred slot.
///
/// The entry point has stable identity: clones compare equal under
/// [`stable_eq`](WriteDeferred::stable_eq) and remain valid across
/// [`rebind`](WriteDeferred::rebind), so the handle can live inside
/// long-lived host callbacks without going stale.
pub struct WriteDeferred<T> {
    write: StableFn<Updater<T>>,
    cell: Rc<ValueCell<T>>,
}

impl<T> Clone for WriteDeferred<T> {
    fn clone(&self) -> Self {
        Self {
            write: self.write.clone(),
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: 'static> WriteDeferred<T> {
    /// Queue an updater for the next flush. Does not mutate the readable
    /// value synchronously.
    pub fn write(&self, updater: Updater<T>) {
        self.write.call(updater);
    }

    /// Queue a literal replacement.
    pub fn set(&self, value: T) {
        self.write(Updater::value(value));
    }

    /// Queue a derivation from the old committed value.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.write(Updater::compute(f));
    }

    /// Point this slot at a different batcher without changing the entry
    /// point's identity. Handles already held elsewhere keep working and
    /// route through the new batcher from the next write on.
    pub fn rebind(&self, notifier: Notifier) {
        self.write
            .replace(commit_entry(notifier, Rc::clone(&self.cell)));
    }

    /// Whether two handles share one write entry point.
    pub fn stable_eq(&self, other: &Self) -> bool {
        self.write.ptr_eq(&other.write)
    }
}

impl<T: fmt::Debug> fmt::Debug for WriteDeferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteDeferred")
            .field("write", &self.write)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
