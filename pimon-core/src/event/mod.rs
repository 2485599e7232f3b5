//! Kernel event records.
//!
//! Lines emitted by the instrumented kernel carry one JSON object somewhere in
//! the text, usually behind a console prefix:
//!
//! ```text
//! [cpu1] PI Detailed Test {"event":"priority_boost","holder_pid":4,"waiter_pid":5,"old_priority":20,"new_priority":10}
//! ```
//!
//! `parse` pulls that object out and turns it into an [`Event`]. Nothing in
//! here fails loudly: a line without a usable record is simply not an event.
//! Kind-specific fields are only checked when the processor asks for a
//! [`Payload`].

mod error;
mod parse;
mod types;

#[cfg(test)]
mod tests;

pub use error::EventError;
pub use parse::{extract_record, parse_line};
pub use types::{
    Event, EventKind, LockAcquired, LockReleased, LockRequest, Payload, Pid, Priority,
    PriorityBoost, PriorityRestore,
};
