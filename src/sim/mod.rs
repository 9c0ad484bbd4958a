//! Stepwise simulation driving.
//!
//! This module decouples "perform one unit of algorithmic work" from
//! "drive many units at a wall-clock rate".
//!
//! A kernel implements [`Stepwise`]: it owns its data, advances one unit
//! per [`Stepwise::advance`] call, and reports when the work is exhausted.
//! [`Simulator`] wraps a kernel in a small state machine
//! ([`SimState`]: Idle, Running, Paused, Completed) and adds:
//!
//! - manual single-stepping ([`Simulator::step`]),
//! - a timed continuous mode gated to at most one unit per
//!   `1000ms / speed` ([`Simulator::tick`]),
//! - pause / toggle / reset with the usual media-player semantics,
//! - an immutable [`Snapshot`] after each unit, sufficient for a renderer
//!   to redraw without recomputation.
//!
//! The scheduling primitive itself is the host's business: the host calls
//! [`Simulator::tick`] from whatever animation-frame or timer source it
//! has, passing a monotonic timestamp, and stops scheduling once `tick`
//! returns `false`. A tick that fires after `pause()` or `reset()`
//! observes the state change and becomes a no-op, so cancellation needs
//! no coordination beyond the single scheduling thread.

mod controller;
mod traits;

pub use controller::{SimState, Simulator, Snapshot, SPEED_MAX, SPEED_MIN};
pub use traits::{StepOutcome, Stepwise};
