//! Turns one inbound event into zero or more provenance-linked events.
//!
//! Per inbound event, in order, stopping at the first gate that rejects it:
//! breaker, interest, credential, dedup, netblock admission. Surviving
//! events become a key set (one address per range member, walked lazily,
//! or the payload itself) and every key is looked up at most once per run.
//! Evidence for range members hangs off a synthesized address event so
//! lineage reads `NETBLOCK_* -> IP_ADDRESS -> RAW_RIR_DATA`.

use std::net::IpAddr;

use hostintel_model::{Event, EventType, ModuleDescriptor};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::{
    breaker::CircuitBreaker,
    module::{self, MODULE_NAME},
    options::ModuleOptions,
    range,
    seen::{SeenKey, SeenSet},
    source::{HostRecord, SourceClient},
};

/// Per-run instance of the unit.
///
/// The orchestrator calls [`EventProcessor::handle`] one event at a time;
/// `&mut self` is what enforces that. Hosts that want to share an instance
/// across tasks wrap it in a mutex.
#[derive(Debug)]
pub struct EventProcessor<C> {
    options: ModuleOptions,
    descriptor: ModuleDescriptor,
    client: C,
    seen: SeenSet,
    breaker: CircuitBreaker,
    stop: CancellationToken,
}

impl<C> EventProcessor<C>
where
    C: SourceClient,
{
    pub fn new(options: ModuleOptions, client: C, stop: CancellationToken) -> Self {
        let descriptor = module::descriptor(&options);
        Self {
            options,
            descriptor,
            client,
            seen: SeenSet::new(),
            breaker: CircuitBreaker::new(),
            stop,
        }
    }

    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn watches(&self, event_type: EventType) -> bool {
        self.descriptor.watches(event_type)
    }

    /// Handle one inbound event. Never fails: every error path yields fewer
    /// (possibly zero) events.
    pub async fn handle(&mut self, event: &Event) -> Vec<Event> {
        if self.breaker.is_tripped() {
            return Vec::new();
        }
        if !self.watches(event.event_type()) {
            return Vec::new();
        }

        debug!(
            event_type = %event.event_type(),
            producer = event.producer(),
            "received event"
        );

        if !self.breaker.check_credential(&self.options).is_ok() {
            return Vec::new();
        }

        let seen_key = SeenKey::from_data(event.data());
        if self.seen.has(&seen_key) {
            debug!(key = %seen_key, "skipping, already processed");
            return Vec::new();
        }
        self.seen.mark(seen_key);

        let Some(keys) = self.keys_for(event) else {
            return Vec::new();
        };
        let expanding = event.event_type().is_aggregate_range();

        let mut emitted = Vec::new();
        for key in keys {
            if expanding && !self.seen.mark(SeenKey::from_data(&key)) {
                debug!(key = key.as_str(), "address already processed");
                continue;
            }

            let record = match self.client.query(&key).await {
                Ok(record) => record,
                Err(err) => {
                    debug!(key = key.as_str(), error = %err, "no record, moving on");
                    continue;
                }
            };

            let synthesized = expanding.then(|| {
                Event::derived(address_type(&key), key.clone(), MODULE_NAME, event)
            });
            if let Some(address_event) = &synthesized {
                emitted.push(address_event.clone());
            }
            let parent = synthesized.as_ref().unwrap_or(event);

            emitted.push(Event::derived(
                EventType::RawRirData,
                record.raw.clone(),
                MODULE_NAME,
                parent,
            ));
            emitted.extend(findings(parent, &key, &record));

            if self.stop.is_cancelled() {
                debug!(key = key.as_str(), "stop requested, abandoning remaining keys");
                break;
            }
        }

        emitted
    }

    /// Keys to look up for `event`, or `None` when a netblock is not
    /// admitted. Ranges are walked lazily; the caller marks each address as
    /// it reaches it and skips the ones seen earlier in the run.
    fn keys_for(&self, event: &Event) -> Option<Box<dyn Iterator<Item = String> + Send>> {
        let kind = event.event_type();
        if !kind.is_aggregate_range() {
            return Some(Box::new(std::iter::once(event.data().to_string())));
        }

        let (enabled, max_prefix) = match kind {
            EventType::NetblockOwner => (
                self.options.expand_owned_netblocks,
                self.options.max_owned_netblock_prefix,
            ),
            _ => (self.options.expand_subnets, self.options.max_subnet_prefix),
        };
        if !enabled {
            debug!(event_type = %kind, "netblock lookups disabled");
            return None;
        }

        let network = match range::parse_range(event.data()) {
            Ok(network) => network,
            Err(err) => {
                error!(error = %err, "skipping malformed network range");
                return None;
            }
        };
        if !range::admits(&network, max_prefix) {
            debug!(
                range = event.data(),
                prefix = network.prefix(),
                max_prefix,
                "network size bigger than permitted"
            );
            return None;
        }

        Some(Box::new(
            range::expand_network(network).map(|addr| addr.to_string()),
        ))
    }
}

fn address_type(key: &str) -> EventType {
    match key.parse::<IpAddr>() {
        Ok(IpAddr::V6(_)) => EventType::Ipv6Address,
        _ => EventType::IpAddress,
    }
}

fn socket(address: &str, port: u16) -> String {
    match address.parse::<IpAddr>() {
        Ok(IpAddr::V6(_)) => format!("[{address}]:{port}"),
        _ => format!("{address}:{port}"),
    }
}

/// Events derived from the record's inspected members, all parented to the
/// same address-level event as the raw evidence.
fn findings(parent: &Event, address: &str, record: &HostRecord) -> Vec<Event> {
    let derive = |kind, data: String| Event::derived(kind, data, MODULE_NAME, parent);
    let mut out = Vec::new();

    if let Some(os) = &record.os {
        out.push(derive(EventType::OperatingSystem, format!("{os} ({address})")));
    }
    if let Some(device) = &record.device_type {
        out.push(derive(EventType::DeviceType, format!("{device} ({address})")));
    }

    let mut ports: Vec<u16> = Vec::new();
    for port in &record.ports {
        if !ports.contains(port) {
            ports.push(*port);
            out.push(derive(EventType::TcpPortOpen, socket(address, *port)));
        }
    }
    for service in record.services.iter().filter(|s| s.transport.eq_ignore_ascii_case("tcp")) {
        out.push(derive(EventType::TcpPortOpenBanner, service.banner.clone()));
    }

    if let Some(location) = record.location() {
        out.push(derive(EventType::GeoInfo, location));
    }
    for vuln in &record.vulns {
        out.push(derive(EventType::Vulnerability, vuln.clone()));
    }

    out
}
