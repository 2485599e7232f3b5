//! Live monitoring from the terminal.
//!
//! The watcher tails the kernel log and feeds the monitor; this module
//! subscribes to the resulting deltas and shows them one of three ways:
//! - **Raw mode**: one JSON delta per line on stdout, for piping elsewhere
//! - **Pretty mode**: one coloured line per boost or inversion
//! - **Stats mode**: a dashboard of the default scenario, redrawn every second
//!
//! The overall data flow is:
//!
//! kernel log
//! Watcher
//! Monitor
//! BroadcastNotifier
//! Delta
//! render_pretty / render_stats
//!

mod constants;
mod render;
mod run;


pub use render::{render_pretty, render_stats};
pub use run::{WatchOptions, run_watch};
