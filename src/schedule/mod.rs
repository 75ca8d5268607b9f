//! Later-turn scheduling: the turn loop, the scheduling seam, and the
//! tokio-backed update channel.
//!
//! - [`Schedule`] — the seam batching consumers depend on.
//! - [`TurnLoop`] / [`TurnHandle`] — deterministic cooperative loop.
//! - [`Channel`] / [`ChannelPump`] — async-host implementation.

pub mod channel;
pub mod turn;

pub use channel::{Channel, ChannelError, ChannelPump};
pub use turn::{Schedule, Task, TurnHandle, TurnLoop};
