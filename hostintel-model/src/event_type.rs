use std::{fmt, str::FromStr};

use crate::error::UnknownEventType;

/// Vocabulary of event types flowing through the reconnaissance pipeline.
///
/// Names are stable wire identifiers shared with every other unit of the
/// pipeline, so they are spelled out explicitly rather than derived from
/// the variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "String", into = "&'static str")
)]
pub enum EventType {
    /// Seed injected by the orchestrator for the scan target.
    Root,
    IpAddress,
    Ipv6Address,
    NetblockOwner,
    NetblockMember,
    DomainName,
    InternetName,
    WebAnalyticsId,
    EmailAddress,
    AffiliateIpAddress,
    CoHostedSite,
    RawRirData,
    OperatingSystem,
    DeviceType,
    TcpPortOpen,
    TcpPortOpenBanner,
    GeoInfo,
    Vulnerability,
}

impl EventType {
    pub const ALL: [EventType; 18] = [
        Self::Root,
        Self::IpAddress,
        Self::Ipv6Address,
        Self::NetblockOwner,
        Self::NetblockMember,
        Self::DomainName,
        Self::InternetName,
        Self::WebAnalyticsId,
        Self::EmailAddress,
        Self::AffiliateIpAddress,
        Self::CoHostedSite,
        Self::RawRirData,
        Self::OperatingSystem,
        Self::DeviceType,
        Self::TcpPortOpen,
        Self::TcpPortOpenBanner,
        Self::GeoInfo,
        Self::Vulnerability,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "ROOT",
            Self::IpAddress => "IP_ADDRESS",
            Self::Ipv6Address => "IPV6_ADDRESS",
            Self::NetblockOwner => "NETBLOCK_OWNER",
            Self::NetblockMember => "NETBLOCK_MEMBER",
            Self::DomainName => "DOMAIN_NAME",
            Self::InternetName => "INTERNET_NAME",
            Self::WebAnalyticsId => "WEB_ANALYTICS_ID",
            Self::EmailAddress => "EMAILADDR",
            Self::AffiliateIpAddress => "AFFILIATE_IPADDR",
            Self::CoHostedSite => "CO_HOSTED_SITE",
            Self::RawRirData => "RAW_RIR_DATA",
            Self::OperatingSystem => "OPERATING_SYSTEM",
            Self::DeviceType => "DEVICE_TYPE",
            Self::TcpPortOpen => "TCP_PORT_OPEN",
            Self::TcpPortOpenBanner => "TCP_PORT_OPEN_BANNER",
            Self::GeoInfo => "GEOINFO",
            Self::Vulnerability => "VULNERABILITY",
        }
    }

    /// True for the `NETBLOCK_*` family, whose payload denotes a range of
    /// addresses rather than a single one.
    pub const fn is_aggregate_range(self) -> bool {
        matches!(self, Self::NetblockOwner | Self::NetblockMember)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .ok_or_else(|| UnknownEventType(value.to_string()))
    }
}

impl TryFrom<String> for EventType {
    type Error = UnknownEventType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventType> for &'static str {
    fn from(value: EventType) -> Self {
        value.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_name_roundtrip() {
        for kind in EventType::ALL {
            assert_eq!(kind.name().parse::<EventType>().unwrap(), kind);
        }
        assert_eq!(EventType::EmailAddress.to_string(), "EMAILADDR");
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "SOCIAL_MEDIA".parse::<EventType>().unwrap_err();
        assert_eq!(err, UnknownEventType("SOCIAL_MEDIA".into()));
        assert!("ip_address".parse::<EventType>().is_err());
    }

    #[test]
    fn only_netblocks_are_aggregate_ranges() {
        let ranges: Vec<_> = EventType::ALL
            .into_iter()
            .filter(|kind| kind.is_aggregate_range())
            .collect();
        assert_eq!(
            ranges,
            vec![EventType::NetblockOwner, EventType::NetblockMember]
        );
    }
}
