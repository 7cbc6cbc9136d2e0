use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hostintel_model::EventType;

#[derive(Parser, Debug)]
#[command(
    name = "hostintelctl",
    version,
    about = "Enrich addresses and netblocks with host intelligence"
)]
pub struct Cli {
    /// `.env` file to load before resolving configuration
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the unit over one or more seed events and print every event produced
    Run {
        /// Seed events as TYPE=DATA, e.g. NETBLOCK_OWNER=203.0.113.0/30
        #[arg(required = true, value_parser = parse_seed)]
        seeds: Vec<Seed>,
        /// Config file (TOML or JSON); overrides $HOSTINTEL_CONFIG_PATH
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the unit's descriptor and recognized options
    Describe {
        #[arg(long)]
        json: bool,
    },
    /// Resolve configuration and report problems without running anything
    CheckConfig {
        /// Config file (TOML or JSON); overrides $HOSTINTEL_CONFIG_PATH
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented provenance tree
    Text,
    /// One JSON object per event
    Jsonl,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seed {
    pub event_type: EventType,
    pub data: String,
}

fn parse_seed(raw: &str) -> Result<Seed, String> {
    let (kind, data) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=DATA, got {raw:?}"))?;
    let event_type = kind.trim().parse::<EventType>().map_err(|err| err.to_string())?;
    let data = data.trim();
    if data.is_empty() {
        return Err(format!("seed {kind} has no data"));
    }
    Ok(Seed {
        event_type,
        data: data.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_type_and_data() {
        let seed = parse_seed("NETBLOCK_OWNER=203.0.113.0/30").unwrap();
        assert_eq!(seed.event_type, EventType::NetblockOwner);
        assert_eq!(seed.data, "203.0.113.0/30");
    }

    #[test]
    fn seeds_need_a_known_type_and_data() {
        assert!(parse_seed("203.0.113.1").is_err());
        assert!(parse_seed("HOSTNAME=example.com").is_err());
        assert!(parse_seed("IP_ADDRESS=").is_err());
    }
}
