//! # coalesce
//!
//! An update-coalescing scheduler and deferred state slots for reactive UIs.
//!
//! When several independent state writes happen in the same synchronous
//! turn, coalesce defers the visible commits and executes them together,
//! exactly once, on a later turn — one flush, one render cycle, instead of
//! one per write. Everything runs inside a single cooperative event loop;
//! there is no cross-thread concurrency anywhere in this crate.
//!
//! ## Core Systems
//!
//! - **[`schedule`]** — later-turn scheduling: the [`Schedule`] seam, a
//!   deterministic [`TurnLoop`], and a tokio-backed [`Channel`]
//! - **[`batcher`]** — the [`Batcher`]: pending commit queue, one flush per
//!   idle period, FIFO execution inside a batched-update scope
//! - **[`scope`]** — the [`BatchScope`] boundary to the host's rendering
//!   collaborator
//! - **[`state`]** — deferred state slots: [`create_deferred`] read/write
//!   pairs, [`ValueCell`] with redraw trigger, [`StableFn`] identity wrapper
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use coalesce::{create_deferred, Batcher, DirectScope, TurnLoop};
//!
//! let lp = TurnLoop::new();
//! let batcher = Batcher::new(Rc::new(lp.handle()), Rc::new(DirectScope));
//! let (count, set_count) = create_deferred(batcher.notifier(), 0);
//!
//! set_count.update(|v| v + 1);
//! set_count.update(|v| v + 1);
//! assert_eq!(count.get(), 0); // nothing committed yet
//!
//! lp.turn(); // the single flush runs here
//! assert_eq!(count.get(), 2);
//! ```

// Scheduling
pub mod schedule;

// Batching
pub mod batcher;
pub mod scope;

// Deferred state
pub mod state;

pub use batcher::{Batcher, Commit, Notifier};
pub use schedule::{Channel, ChannelError, ChannelPump, Schedule, Task, TurnHandle, TurnLoop};
pub use scope::{BatchScope, DirectScope, NotifyingScope};
pub use state::{
    create_deferred, create_deferred_with_cell, ReadDeferred, StableFn, Updater, ValueCell,
    WriteDeferred,
};
