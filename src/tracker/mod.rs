//! Momentum, threat and scene tracking.
//!
//! - [`Counter`]: the two group counters and their clamping rules
//! - [`Tracker`]: typed state on top of the [`JsonStore`](crate::store::JsonStore)
//!
//! # Clamping
//!
//! `set` floors both counters at 0 and caps momentum at 6. `add` and `use`
//! cap their result at 5 and then go through `set`, so the two rules compose:
//! threat can exceed 5 through `set` but an `add` brings it back to 5.

mod counter;
mod state;

pub use crate::tracker::{
    counter::Counter,
    state::{CounterChange, SceneEnd, SceneStart, Tracker},
};

#[cfg(test)]
pub(crate) use crate::tracker::state::tests::create_test_tracker;
