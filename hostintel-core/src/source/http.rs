use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{error, info};

use super::{HostRecord, QueryError, SourceClient};
use crate::error::{IntelError, Result};

pub const DEFAULT_ENDPOINT: &str =
    "https://api.shodan.io/shodan/host/{key}?key={credential}";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Identity the source sees on every request.
pub const CLIENT_IDENTITY: &str = "hostintel";

/// Transport settings supplied by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// URL template; `{key}` and `{credential}` are substituted per request.
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: CLIENT_IDENTITY.to_string(),
        }
    }
}

pub struct HttpSourceClient {
    http: reqwest::Client,
    endpoint: String,
    credential: String,
}

impl fmt::Debug for HttpSourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSourceClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpSourceClient {
    pub fn new(
        settings: &SourceSettings,
        credential: impl Into<String>,
    ) -> Result<Self> {
        validate_endpoint(&settings.endpoint)?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(IntelError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            credential: credential.into(),
        })
    }

    fn url_for(&self, key: &str) -> String {
        render(&self.endpoint, key, &self.credential)
    }
}

fn render(template: &str, key: &str, credential: &str) -> String {
    template
        .replace("{key}", &urlencoding::encode(key))
        .replace("{credential}", &urlencoding::encode(credential))
}

fn validate_endpoint(template: &str) -> Result<()> {
    if !template.contains("{key}") {
        return Err(IntelError::Endpoint {
            template: template.to_string(),
            reason: "missing {key} placeholder".to_string(),
        });
    }
    reqwest::Url::parse(&render(template, "192.0.2.1", "credential")).map_err(
        |err| IntelError::Endpoint {
            template: template.to_string(),
            reason: err.to_string(),
        },
    )?;
    Ok(())
}

// The request URL carries the credential, so it is stripped from transport
// errors before they can reach a log line.
fn transport(err: reqwest::Error) -> QueryError {
    QueryError::TransportFailure(err.without_url())
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn query(&self, key: &str) -> std::result::Result<HostRecord, QueryError> {
        let response = match self.http.get(self.url_for(key)).send().await {
            Ok(response) => response,
            Err(err) => {
                let err = transport(err);
                error!(key, error = %err, "host lookup failed");
                return Err(err);
            }
        };

        if response.status() == StatusCode::NOT_FOUND {
            info!(key, "no host information found");
            return Err(QueryError::EmptyResponse);
        }

        let body = match response.error_for_status() {
            Ok(response) => response.text().await.map_err(transport),
            Err(err) => Err(transport(err)),
        };
        let body = match body {
            Ok(body) => body,
            Err(err) => {
                error!(key, error = %err, "host lookup failed");
                return Err(err);
            }
        };

        match HostRecord::parse(&body) {
            Ok(record) => Ok(record),
            Err(QueryError::EmptyResponse) => {
                info!(key, "no host information found");
                Err(QueryError::EmptyResponse)
            }
            Err(err) => {
                error!(key, error = %err, "error processing JSON response from host lookup");
                Err(err)
            }
        }
    }
}
