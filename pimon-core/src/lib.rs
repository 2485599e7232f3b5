pub mod broadcast;
pub mod classify;
pub mod cli;
pub mod clock;
pub mod conf;
pub mod event;
pub mod logging;
pub mod monitor;
pub mod processor;
pub mod projector;
pub mod scenario;
pub mod watcher;

pub use monitor::{Monitor, MonitorError, ReplayError, ReplayRecord};
