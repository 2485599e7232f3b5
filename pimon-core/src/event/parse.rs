use crate::event::Event;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Return the first balanced `{...}` span in `line`.
///
/// Braces inside JSON string literals are ignored, so nested objects and
/// values such as `"lock": "{a}"` are handled. If the first `{` never closes
/// there is no record.
pub fn extract_record(line: &str) -> Option<&str> {
    let start = line.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in line.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    // Both ends are ASCII, so this is always a char boundary.
                    return Some(&line[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse one raw log line into an event stamped with `now`.
///
/// Never fails: noise, truncated records, non-object JSON and records without
/// an `event` name all yield `None`.
pub fn parse_line(line: &str, now: DateTime<Utc>) -> Option<Event> {
    let candidate = extract_record(line)?;

    let record = match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(record)) => record,
        Ok(_) => return None,
        Err(e) => {
            tracing::trace!(error = %e, "skipping undecodable record");
            return None;
        }
    };

    Event::from_record(record, now)
}
