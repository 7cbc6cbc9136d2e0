//! # Hostintel Core
//!
//! Enrichment unit of a reconnaissance pipeline. Given address-like events
//! (IP addresses, owned netblocks, domain names, analytics ids) it looks each
//! target up in a host-intelligence source and emits the findings as new
//! events linked back to whatever caused them.
//!
//! ## Architecture
//!
//! - [`processor`]: the per-event pipeline: filtering, deduplication,
//!   netblock expansion and lookup
//! - [`source`]: the [`SourceClient`](source::SourceClient) boundary and its
//!   reqwest adapter
//! - [`options`]: recognized options and override merging
//! - [`breaker`]: latch that stops the unit when no credential is configured
//! - [`range`]: CIDR parsing, expansion and admission
//! - [`seen`]: run-scoped memory of handled payloads
//! - [`provenance`] and [`runner`]: an event log and a small in-process
//!   driver for running the unit outside a full orchestrator
//!
//! ## Examples
//!
//! ```no_run
//! use hostintel_core::{
//!     EventProcessor, HttpSourceClient, ModuleOptions, ScanRunner, SourceSettings,
//! };
//! use hostintel_model::{Event, EventType};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn enrich() -> hostintel_core::Result<()> {
//!     let options = ModuleOptions {
//!         credential: "api-key".into(),
//!         ..ModuleOptions::default()
//!     };
//!     let client = HttpSourceClient::new(&SourceSettings::default(), &options.credential)?;
//!     let stop = CancellationToken::new();
//!     let processor = EventProcessor::new(options, client, stop.clone());
//!
//!     let mut runner = ScanRunner::new(processor, stop);
//!     let seed = Event::seed(EventType::NetblockOwner, "203.0.113.0/30", "operator");
//!     runner.run([seed]).await;
//!
//!     for event in runner.log().iter() {
//!         println!("{} {}", event.event_type(), event.data());
//!     }
//!     Ok(())
//! }
//! ```
#![allow(missing_docs)]

pub mod breaker;
pub mod error;
#[cfg(test)]
mod log_capture;
pub mod module;
pub mod options;
pub mod processor;
pub mod provenance;
pub mod range;
pub mod runner;
pub mod seen;
pub mod source;

pub use breaker::{CircuitBreaker, CredentialCheck};
pub use error::{IntelError, Result};
pub use module::{MODULE_NAME, descriptor};
pub use options::{MergedOptions, ModuleOptions, OptionsError};
pub use processor::EventProcessor;
pub use provenance::EventLog;
pub use range::MalformedRangeError;
pub use runner::ScanRunner;
pub use seen::{SeenKey, SeenSet};
pub use source::{
    HostRecord, HttpSourceClient, QueryError, SourceClient, SourceSettings,
};
