//! Later-turn scheduling over a local update channel.
//!
//! [`Channel`] is the async-host implementation of [`Schedule`]: tasks are
//! sent down a tokio unbounded queue and executed by a [`ChannelPump`]
//! future spawned on the host's `LocalSet`. Because the pump is a separate
//! task, a scheduled callback can only run once the scheduling task yields
//! — strictly after the current synchronous turn, never within it.
//!
//! Everything here is single-threaded: tasks are plain (non-`Send`) boxed
//! closures, so the pump must be spawned with `tokio::task::spawn_local`.

use tokio::sync::mpsc;

use super::turn::{Schedule, Task};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by [`Channel::try_schedule`].
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The pump future has finished or been dropped; the task was not queued.
    #[error("update channel closed: pump has shut down")]
    Closed,
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Sender half: schedules tasks onto the pump.
#[derive(Clone)]
pub struct Channel {
    tx: mpsc::UnboundedSender<Task>,
}

/// Receiver half: drives scheduled tasks. Spawn [`run`](ChannelPump::run)
/// on a `LocalSet`.
pub struct ChannelPump {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl Channel {
    /// Create a connected channel/pump pair.
    pub fn new() -> (Channel, ChannelPump) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Channel { tx }, ChannelPump { rx })
    }

    /// Schedule `task` for a later turn, or report that the pump is gone.
    pub fn try_schedule(&self, task: Task) -> Result<(), ChannelError> {
        self.tx.send(task).map_err(|_| ChannelError::Closed)
    }
}

impl Schedule for Channel {
    /// Schedule `task` for a later turn.
    ///
    /// Once the pump has shut down, tasks are dropped: queued commits are
    /// assumed cheap and harmless, so there is no teardown notification
    /// path at this seam. Callers that need to observe shutdown use
    /// [`try_schedule`](Channel::try_schedule).
    fn schedule(&self, task: Task) {
        let _ = self.try_schedule(task);
    }
}

impl ChannelPump {
    /// Receive and execute tasks until every [`Channel`] clone is dropped.
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            task();
        }
    }

    /// Execute tasks already queued, without waiting for more.
    ///
    /// Returns the number of tasks executed. Useful for hosts that
    /// interleave pumping with their own frame loop.
    pub fn drain_ready(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task;

    #[test]
    fn scheduled_task_runs_after_current_turn() {
        let local = task::LocalSet::new();
        tokio_test::block_on(local.run_until(async {
            let (channel, pump) = Channel::new();
            task::spawn_local(pump.run());

            let ran = Rc::new(Cell::new(false));
            let ran_c = ran.clone();
            channel.schedule(Box::new(move || ran_c.set(true)));

            // Still within the scheduling turn: nothing has run.
            assert!(!ran.get());

            task::yield_now().await;
            assert!(ran.get());
        }));
    }

    #[test]
    fn tasks_run_in_schedule_order() {
        let local = task::LocalSet::new();
        tokio_test::block_on(local.run_until(async {
            let (channel, pump) = Channel::new();
            task::spawn_local(pump.run());

            let log = Rc::new(std::cell::RefCell::new(Vec::new()));
            for i in 0..4 {
                let log_c = log.clone();
                channel.schedule(Box::new(move || log_c.borrow_mut().push(i)));
            }
            task::yield_now().await;
            assert_eq!(*log.borrow(), vec![0, 1, 2, 3]);
        }));
    }

    #[test]
    fn drain_ready_runs_queued_tasks_synchronously() {
        let (channel, mut pump) = Channel::new();
        let count = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let count_c = count.clone();
            channel.schedule(Box::new(move || count_c.set(count_c.get() + 1)));
        }
        assert_eq!(pump.drain_ready(), 3);
        assert_eq!(count.get(), 3);
        assert_eq!(pump.drain_ready(), 0);
    }

    #[test]
    fn try_schedule_after_pump_drop_reports_closed() {
        let (channel, pump) = Channel::new();
        drop(pump);
        let result = channel.try_schedule(Box::new(|| {}));
        assert!(matches!(result, Err(ChannelError::Closed)));
    }

    #[test]
    fn schedule_after_pump_drop_is_silent() {
        let (channel, pump) = Channel::new();
        drop(pump);
        // Dropped, not panicking: post-teardown commits are discarded.
        channel.schedule(Box::new(|| unreachable!("dropped task must not run")));
    }

    #[test]
    fn cloned_channels_feed_one_pump() {
        let (channel, mut pump) = Channel::new();
        let other = channel.clone();
        let count = Rc::new(Cell::new(0));
        for ch in [&channel, &other] {
            let count_c = count.clone();
            ch.schedule(Box::new(move || count_c.set(count_c.get() + 1)));
        }
        assert_eq!(pump.drain_ready(), 2);
        assert_eq!(count.get(), 2);
    }
}
