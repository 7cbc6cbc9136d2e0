//! Options recognized by the unit for one run.
//!
//! The orchestrator shares one option namespace across every unit it runs,
//! so overrides for keys this unit does not know are accepted and reported
//! back instead of rejected.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("invalid value for option `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Immutable snapshot of the unit's options, fixed at setup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleOptions {
    /// API key for the intelligence source. Empty trips the breaker.
    #[serde(rename = "api_key")]
    pub credential: String,
    /// Expand netblocks deemed owned by the target and look up every address.
    #[serde(rename = "netblocklookup")]
    pub expand_owned_netblocks: bool,
    /// Smallest owned-netblock prefix (largest range) that will be expanded.
    #[serde(rename = "maxnetblock")]
    pub max_owned_netblock_prefix: u8,
    /// Expand subnets the target is a member of.
    #[serde(rename = "subnetlookup")]
    pub expand_subnets: bool,
    /// Smallest member-subnet prefix that will be expanded.
    #[serde(rename = "maxsubnet")]
    pub max_subnet_prefix: u8,
    #[serde(rename = "maxcohost")]
    pub max_cohosted_sites: usize,
    #[serde(rename = "verify")]
    pub verify_resolution: bool,
    #[serde(rename = "cohostsamedomain")]
    pub treat_same_domain_as_cohosted: bool,
    #[serde(rename = "checkcohosts")]
    pub check_cohosts: bool,
    #[serde(rename = "checkaffiliates")]
    pub check_affiliates: bool,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            credential: String::new(),
            expand_owned_netblocks: true,
            max_owned_netblock_prefix: 24,
            expand_subnets: false,
            max_subnet_prefix: 24,
            max_cohosted_sites: 100,
            verify_resolution: true,
            treat_same_domain_as_cohosted: false,
            check_cohosts: true,
            check_affiliates: true,
        }
    }
}

impl fmt::Debug for ModuleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credential = if self.credential.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ModuleOptions")
            .field("credential", &credential)
            .field("expand_owned_netblocks", &self.expand_owned_netblocks)
            .field("max_owned_netblock_prefix", &self.max_owned_netblock_prefix)
            .field("expand_subnets", &self.expand_subnets)
            .field("max_subnet_prefix", &self.max_subnet_prefix)
            .field("max_cohosted_sites", &self.max_cohosted_sites)
            .field("verify_resolution", &self.verify_resolution)
            .field(
                "treat_same_domain_as_cohosted",
                &self.treat_same_domain_as_cohosted,
            )
            .field("check_cohosts", &self.check_cohosts)
            .field("check_affiliates", &self.check_affiliates)
            .finish()
    }
}

/// Option keys paired with the description shown to whoever configures a
/// scan.
pub const OPTION_DESCRIPTIONS: &[(&str, &str)] = &[
    ("api_key", "Intelligence source API key."),
    ("checkcohosts", "Check co-hosted sites?"),
    ("checkaffiliates", "Check affiliates?"),
    (
        "netblocklookup",
        "Look up all IPs on netblocks deemed to be owned by your target for possible hosts on the same target subdomain/domain?",
    ),
    (
        "maxnetblock",
        "If looking up owned netblocks, the maximum netblock size to look up all IPs within (CIDR value, 24 = /24, 16 = /16, etc.)",
    ),
    (
        "subnetlookup",
        "Look up all IPs on subnets which your target is a part of?",
    ),
    (
        "maxsubnet",
        "If looking up subnets, the maximum subnet size to look up all the IPs within (CIDR value, 24 = /24, 16 = /16, etc.)",
    ),
    (
        "maxcohost",
        "Stop reporting co-hosted sites after this many are found, as it would likely indicate web hosting.",
    ),
    (
        "cohostsamedomain",
        "Treat co-hosted sites on the same target domain as co-hosting?",
    ),
    (
        "verify",
        "Verify that any hostnames found on the target domain still resolve?",
    ),
];

/// Result of applying orchestrator overrides on top of the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedOptions {
    pub options: ModuleOptions,
    /// Keys outside this unit's namespace; accepted without effect.
    pub ignored_keys: Vec<String>,
}

impl ModuleOptions {
    pub fn describe() -> &'static [(&'static str, &'static str)] {
        OPTION_DESCRIPTIONS
    }

    pub fn is_recognized(key: &str) -> bool {
        OPTION_DESCRIPTIONS.iter().any(|(name, _)| *name == key)
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }

    /// Apply `overrides` on top of `self`. Recognized keys replace the
    /// current value and must have the right type; anything else is
    /// collected in [`MergedOptions::ignored_keys`].
    pub fn merged(
        &self,
        overrides: &Map<String, Value>,
    ) -> Result<MergedOptions, OptionsError> {
        let mut current = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => Map::new(),
        };
        let mut ignored_keys = Vec::new();

        for (key, value) in overrides {
            if !Self::is_recognized(key) {
                ignored_keys.push(key.clone());
                continue;
            }
            current.insert(key.clone(), value.clone());
            serde_json::from_value::<ModuleOptions>(Value::Object(
                current.clone(),
            ))
            .map_err(|err| OptionsError::InvalidValue {
                key: key.clone(),
                reason: err.to_string(),
            })?;
        }

        let options = serde_json::from_value(Value::Object(current)).map_err(
            |err| OptionsError::InvalidValue {
                key: "<all>".to_string(),
                reason: err.to_string(),
            },
        )?;

        Ok(MergedOptions {
            options,
            ignored_keys,
        })
    }
}
