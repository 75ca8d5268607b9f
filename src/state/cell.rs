//! Local value cell with a re-render trigger.
//!
//! [`ValueCell`] is the primitive the rendering collaborator supplies: one
//! value of type `T`, a getter, and a setter that schedules the host to
//! re-derive presentation from the new value. Here the trigger is modeled
//! as an optional redraw hook fired on every `set`.

use std::cell::RefCell;
use std::rc::Rc;

/// A single value slot with an optional redraw hook.
pub struct ValueCell<T> {
    value: RefCell<T>,
    redraw: Option<Rc<dyn Fn()>>,
}

impl<T> ValueCell<T> {
    /// Create a cell with no redraw hook.
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            redraw: None,
        }
    }

    /// Create a cell whose setter fires `redraw` after each write.
    pub fn with_redraw(initial: T, redraw: impl Fn() + 'static) -> Self {
        Self {
            value: RefCell::new(initial),
            redraw: Some(Rc::new(redraw)),
        }
    }

    /// Clone out the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Read by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value and fire the redraw hook.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        if let Some(redraw) = &self.redraw {
            redraw();
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCell")
            .field("value", &self.value.borrow())
            .field("has_redraw", &self.redraw.is_some())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_returns_initial() {
        let cell = ValueCell::new(7);
        assert_eq!(cell.get(), 7);
    }

    #[test]
    fn set_replaces_value() {
        let cell = ValueCell::new(0);
        cell.set(42);
        assert_eq!(cell.get(), 42);
    }

    #[test]
    fn with_reads_by_reference() {
        let cell = ValueCell::new(String::from("hello"));
        let len = cell.with(|s| s.len());
        assert_eq!(len, 5);
    }

    #[test]
    fn set_fires_redraw_hook() {
        let draws = Rc::new(Cell::new(0));
        let draws_c = draws.clone();
        let cell = ValueCell::with_redraw(0, move || draws_c.set(draws_c.get() + 1));

        assert_eq!(draws.get(), 0);
        cell.set(1);
        cell.set(2);
        assert_eq!(draws.get(), 2);
    }

    #[test]
    fn plain_cell_has_no_hook() {
        let cell = ValueCell::new(0);
        cell.set(1); // no hook, no panic
        assert_eq!(cell.get(), 1);
    }

    #[test]
    fn debug_format() {
        let cell = ValueCell::new(3);
        let dbg = format!("{:?}", cell);
        assert!(dbg.contains("ValueCell"));
        assert!(dbg.contains('3'));
    }
}
