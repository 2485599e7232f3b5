use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// A field the event kind needs is absent or has the wrong type.
    #[error("{kind} event is missing required field '{field}'")]
    MissingField { kind: String, field: &'static str },
}

impl EventError {
    pub fn missing(kind: &str, field: &'static str) -> Self {
        Self::MissingField {
            kind: kind.to_string(),
            field,
        }
    }
}
