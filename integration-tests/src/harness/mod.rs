mod fixtures;
pub mod tracing;

pub use fixtures::{
    TestLog, lock_acquired, lock_released, lock_request, priority_boost, priority_restore,
    wait_until,
};
pub use tracing::{CapturedEvent, captured_events, init_test_tracing};
