//! Shared fixtures for hostintel-core integration tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use hostintel_core::{
    EventProcessor, HostRecord, ModuleOptions, QueryError, SourceClient,
};
use hostintel_model::{Event, EventType};
use tokio_util::sync::CancellationToken;

pub const LINUX: &str = r#"{"os":"Linux"}"#;

/// Canned source that records every key it is asked about.
#[derive(Debug, Clone, Default)]
pub struct RecordingSource {
    bodies: Arc<HashMap<String, String>>,
    fallback: Option<String>,
    queries: Arc<Mutex<Vec<String>>>,
    stop_after_first: Option<CancellationToken>,
}

impl RecordingSource {
    /// Answers every key with `body`.
    pub fn answering(body: &str) -> Self {
        Self {
            fallback: Some(body.to_string()),
            ..Self::default()
        }
    }

    /// Answers only the listed keys; everything else is `EmptyResponse`.
    pub fn with_records<'a>(records: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            bodies: Arc::new(
                records
                    .into_iter()
                    .map(|(key, body)| (key.to_string(), body.to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Requests a stop while answering the first query.
    pub fn cancelling(mut self, stop: CancellationToken) -> Self {
        self.stop_after_first = Some(stop);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl SourceClient for RecordingSource {
    async fn query(&self, key: &str) -> Result<HostRecord, QueryError> {
        self.queries.lock().expect("queries lock").push(key.to_string());
        if let Some(stop) = &self.stop_after_first {
            stop.cancel();
        }
        match self.bodies.get(key).or(self.fallback.as_ref()) {
            Some(body) => HostRecord::parse(body),
            None => Err(QueryError::EmptyResponse),
        }
    }
}

pub fn options(credential: &str) -> ModuleOptions {
    ModuleOptions {
        credential: credential.to_string(),
        ..ModuleOptions::default()
    }
}

pub fn processor(
    options: ModuleOptions,
    source: &RecordingSource,
    stop: &CancellationToken,
) -> EventProcessor<RecordingSource> {
    EventProcessor::new(options, source.clone(), stop.clone())
}

pub fn seed(kind: EventType, data: &str) -> Event {
    Event::seed(kind, data, "operator")
}

pub fn types(events: &[Event]) -> Vec<EventType> {
    events.iter().map(Event::event_type).collect()
}
