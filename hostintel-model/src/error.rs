use thiserror::Error;

/// Raised when an event type name is not part of the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);
