//! Static description of a pipeline unit: what it consumes, what it emits,
//! and how the orchestrator should classify it.

use std::fmt;

use crate::EventType;

/// Scan profiles a unit is suitable for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UseCase {
    /// Maps the target's footprint on the Internet.
    Footprint,
    /// Investigates risk around the target.
    Investigate,
    /// Never contacts the scan target itself.
    Passive,
}

/// How a unit operates. A unit belongs to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModuleCategory {
    ContentAnalysis,
    CrawlingAndScanning,
    Dns,
    LeaksDumpsAndBreaches,
    PassiveDns,
    PublicRegistries,
    RealWorld,
    ReputationSystems,
    SearchEngines,
    SecondaryNetworks,
    SocialMedia,
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ContentAnalysis => "Content Analysis",
            Self::CrawlingAndScanning => "Crawling and Scanning",
            Self::Dns => "DNS",
            Self::LeaksDumpsAndBreaches => "Leaks, Dumps and Breaches",
            Self::PassiveDns => "Passive DNS",
            Self::PublicRegistries => "Public Registries",
            Self::RealWorld => "Real World",
            Self::ReputationSystems => "Reputation Systems",
            Self::SearchEngines => "Search Engines",
            Self::SecondaryNetworks => "Secondary Networks",
            Self::SocialMedia => "Social Media",
        };
        f.write_str(label)
    }
}

/// Operational attributes surfaced to whoever configures a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ModuleFlag {
    /// Needs an API key to function.
    ApiKey,
    Slow,
    ErrorProne,
    Invasive,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModuleDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub use_cases: &'static [UseCase],
    pub category: ModuleCategory,
    pub flags: &'static [ModuleFlag],
    pub watched: Vec<EventType>,
    pub produced: &'static [EventType],
}

impl ModuleDescriptor {
    pub fn watches(&self, event_type: EventType) -> bool {
        self.watched.contains(&event_type)
    }

    pub fn produces(&self, event_type: EventType) -> bool {
        self.produced.contains(&event_type)
    }

    pub fn requires_api_key(&self) -> bool {
        self.flags.contains(&ModuleFlag::ApiKey)
    }
}
