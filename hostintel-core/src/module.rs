use hostintel_model::{
    EventType, ModuleCategory, ModuleDescriptor, ModuleFlag, UseCase,
};

use crate::options::ModuleOptions;

/// Producer id stamped on every event this unit emits.
pub const MODULE_NAME: &str = "sfp_hostintel";

pub const WATCHED_EVENTS: &[EventType] = &[
    EventType::IpAddress,
    EventType::NetblockOwner,
    EventType::DomainName,
    EventType::WebAnalyticsId,
];

pub const PRODUCED_EVENTS: &[EventType] = &[
    EventType::IpAddress,
    EventType::Ipv6Address,
    EventType::OperatingSystem,
    EventType::DeviceType,
    EventType::TcpPortOpen,
    EventType::TcpPortOpenBanner,
    EventType::RawRirData,
    EventType::GeoInfo,
    EventType::Vulnerability,
];

/// The unit's descriptor under `options`. Member subnets are only watched
/// when subnet lookups are enabled.
pub fn descriptor(options: &ModuleOptions) -> ModuleDescriptor {
    let mut watched = WATCHED_EVENTS.to_vec();
    if options.expand_subnets {
        watched.push(EventType::NetblockMember);
    }

    ModuleDescriptor {
        name: MODULE_NAME,
        title: "Host Intelligence",
        summary: "Obtain operating system, open port, banner, location and vulnerability information about identified IP addresses.",
        use_cases: &[UseCase::Footprint, UseCase::Investigate, UseCase::Passive],
        category: ModuleCategory::SearchEngines,
        flags: &[ModuleFlag::ApiKey],
        watched,
        produced: PRODUCED_EVENTS,
    }
}
