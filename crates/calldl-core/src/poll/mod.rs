//! Polling policy and loop.
//!
//! Every wait in a portal session (an element rendering, a download starting
//! or finishing) is a check repeated on a fixed cadence. This module owns the
//! cadence, the soft-timeout diagnostic and the give-up rules so the waiter
//! and the download monitor share one policy.

mod policy;
mod run;

pub use policy::{PollDecision, PollMode, PollPolicy};
pub use run::poll_until;
