//! Deferred state: value cells, stable callbacks, and deferred slots.
//!
//! - [`create_deferred`] — make a `(read, write)` slot pair bound to a batcher.
//! - [`ValueCell`] — local value cell with a re-render trigger.
//! - [`StableFn`] — fixed-identity callback with swappable behavior.

pub mod cell;
pub mod slot;
pub mod stable;

pub use cell::ValueCell;
pub use slot::{create_deferred, create_deferred_with_cell, ReadDeferred, Updater, WriteDeferred};
pub use stable::StableFn;
