//! Single-threaded cooperative turn loop.
//!
//! [`TurnLoop`] models the event loop this crate lives inside: a later-turn
//! task queue plus a same-turn microtask queue. Tasks posted during a turn
//! run on the *next* turn, never the current one — the property the whole
//! batching design depends on, since every state-change signal raised
//! synchronously in a turn must be captured before the flush fires.
//!
//! The [`Schedule`] trait is the seam consumers depend on; [`TurnHandle`]
//! implements it for deterministic (test and headless) execution, and
//! [`Channel`](crate::schedule::channel::Channel) implements it on top of a
//! tokio task queue for async hosts.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// Schedule trait
// ---------------------------------------------------------------------------

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Later-turn scheduling seam.
///
/// `schedule` arranges for `task` to run exactly once, strictly after the
/// current synchronous turn (and its microtasks) has completed. Distinct
/// calls must produce distinct invocations — coalescing is the caller's
/// job, achieved by scheduling at most once per idle period. No
/// cancellation.
pub trait Schedule {
    /// Arrange for `task` to run once, on a later turn.
    fn schedule(&self, task: Task);
}

// ---------------------------------------------------------------------------
// TurnLoop
// ---------------------------------------------------------------------------

struct Queues {
    /// Later-turn tasks, FIFO.
    tasks: VecDeque<Task>,
    /// End-of-current-task work, FIFO. Always drained before the next task.
    microtasks: VecDeque<Task>,
}

/// A deterministic single-threaded event loop.
///
/// Drive it explicitly with [`turn`](TurnLoop::turn) or
/// [`run_until_idle`](TurnLoop::run_until_idle). All queues live behind an
/// `Rc<RefCell>` shared with every [`TurnHandle`], so tasks may themselves
/// post further tasks.
pub struct TurnLoop {
    queues: Rc<RefCell<Queues>>,
}

/// Cheap cloneable posting handle for a [`TurnLoop`].
#[derive(Clone)]
pub struct TurnHandle {
    queues: Rc<RefCell<Queues>>,
}

impl TurnLoop {
    /// Create a new, idle loop.
    pub fn new() -> Self {
        Self {
            queues: Rc::new(RefCell::new(Queues {
                tasks: VecDeque::new(),
                microtasks: VecDeque::new(),
            })),
        }
    }

    /// A posting handle that shares this loop's queues.
    pub fn handle(&self) -> TurnHandle {
        TurnHandle {
            queues: Rc::clone(&self.queues),
        }
    }

    /// Post a task for a later turn.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.queues.borrow_mut().tasks.push_back(Box::new(task));
    }

    /// Post a microtask: runs at the end of the currently executing task,
    /// before the next later-turn task.
    pub fn post_microtask(&self, task: impl FnOnce() + 'static) {
        self.queues
            .borrow_mut()
            .microtasks
            .push_back(Box::new(task));
    }

    /// Whether both queues are empty.
    pub fn is_idle(&self) -> bool {
        let q = self.queues.borrow();
        q.tasks.is_empty() && q.microtasks.is_empty()
    }

    /// Run one turn. Returns the number of later-turn tasks executed.
    ///
    /// Order: drain pending microtasks, then run exactly the tasks that
    /// were queued when the turn started (tasks posted *during* the turn
    /// wait for the next turn), draining microtasks after each.
    pub fn turn(&self) -> usize {
        self.drain_microtasks();
        let budget = self.queues.borrow().tasks.len();
        let mut ran = 0;
        for _ in 0..budget {
            let task = self.queues.borrow_mut().tasks.pop_front();
            let Some(task) = task else { break };
            task();
            ran += 1;
            self.drain_microtasks();
        }
        ran
    }

    /// Run turns until the loop is idle. Returns total tasks executed.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        while !self.is_idle() {
            total += self.turn();
        }
        total
    }

    fn drain_microtasks(&self) {
        loop {
            let task = self.queues.borrow_mut().microtasks.pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

impl Default for TurnLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnHandle {
    /// Post a task for a later turn.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.queues.borrow_mut().tasks.push_back(Box::new(task));
    }

    /// Post a microtask onto the shared loop.
    pub fn post_microtask(&self, task: impl FnOnce() + 'static) {
        self.queues
            .borrow_mut()
            .microtasks
            .push_back(Box::new(task));
    }
}

impl Schedule for TurnHandle {
    fn schedule(&self, task: Task) {
        self.queues.borrow_mut().tasks.push_back(task);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
