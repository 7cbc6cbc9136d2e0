//! Boundary to the external host-intelligence source.

pub mod http;
pub mod record;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use http::{HttpSourceClient, SourceSettings};
pub use record::{HostRecord, ServiceBanner};

/// Why a query produced no record. None of these are fatal to the scan; the
/// caller moves on to its next key.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("source returned no data")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("transport failure: {0}")]
    TransportFailure(#[source] reqwest::Error),
}

/// One request/response exchange with the source for a single key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceClient: Send + Sync {
    async fn query(&self, key: &str) -> Result<HostRecord, QueryError>;
}

#[async_trait]
impl<T> SourceClient for Arc<T>
where
    T: SourceClient + ?Sized,
{
    async fn query(&self, key: &str) -> Result<HostRecord, QueryError> {
        (**self).query(key).await
    }
}
