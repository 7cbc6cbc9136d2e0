use thiserror::Error;

use crate::options::OptionsError;

/// Setup-time failures. Nothing in here is ever raised while handling
/// events; per-event failures degrade to emitting fewer events instead.
#[derive(Error, Debug)]
pub enum IntelError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("invalid endpoint template {template:?}: {reason}")]
    Endpoint { template: String, reason: String },

    #[error(transparent)]
    Options(#[from] OptionsError),
}

pub type Result<T> = std::result::Result<T, IntelError>;
