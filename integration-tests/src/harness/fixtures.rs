use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// A kernel log file in its own temp directory.
pub struct TestLog {
    dir: TempDir,
    path: PathBuf,
}

impl TestLog {
    /// Reserve a path without creating the file.
    pub fn missing() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xv6_output.log");
        Self { dir, path }
    }

    pub fn with_lines(lines: &[&str]) -> Self {
        let log = Self::missing();
        log.append(lines);
        log
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn append(&self, lines: &[&str]) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
    }

    /// Replace the file contents, as a log rotation would.
    pub fn truncate_with(&self, lines: &[&str]) {
        std::fs::write(&self.path, "").unwrap();
        self.append(lines);
    }
}

pub fn lock_acquired(pid: u32, priority: i32) -> String {
    format!(r#"{{"event":"lock_acquired","pid":{pid},"priority":{priority}}}"#)
}

pub fn lock_request(pid: u32, priority: i32, holder_pid: u32, holder_priority: i32) -> String {
    format!(
        r#"{{"event":"lock_request","pid":{pid},"priority":{priority},"holder_pid":{holder_pid},"holder_priority":{holder_priority}}}"#
    )
}

pub fn priority_boost(holder_pid: u32, waiter_pid: u32, old: i32, new: i32) -> String {
    format!(
        r#"{{"event":"priority_boost","holder_pid":{holder_pid},"waiter_pid":{waiter_pid},"old_priority":{old},"new_priority":{new}}}"#
    )
}

pub fn priority_restore(pid: u32, priority: i32) -> String {
    format!(r#"{{"event":"priority_restore","pid":{pid},"new_priority":{priority}}}"#)
}

pub fn lock_released(pid: u32) -> String {
    format!(r#"{{"event":"lock_released","pid":{pid}}}"#)
}

/// Poll `check` until it holds, panicking after `timeout`.
pub async fn wait_until<F>(timeout: Duration, mut check: F)
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(timeout, async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met before timeout");
}
