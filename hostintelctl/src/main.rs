mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hostintel_config::{CONFIG_PATH_ENV, RunConfig, RunConfigSource, load_env_file};
use hostintel_core::{
    EventLog, EventProcessor, HttpSourceClient, ModuleOptions, ScanRunner, descriptor,
};
use hostintel_model::Event;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, OutputFormat, Seed};

const SEED_PRODUCER: &str = "hostintelctl";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hostintel_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let env_loaded = load_env_file(cli.env_file.as_deref())
        .context("failed to load env file")?;
    if cli.env_file.is_some() && !env_loaded {
        warn!("env file not found, continuing without it");
    }

    match cli.command {
        Command::Run {
            seeds,
            config,
            format,
        } => run(seeds, config, format).await,
        Command::Describe { json } => describe(json),
        Command::CheckConfig { config } => check_config(config),
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<(RunConfig, RunConfigSource)> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    match explicit {
        Some(path) => {
            let path = path.display().to_string();
            RunConfig::load_with(
                |name| match name {
                    CONFIG_PATH_ENV => Some(path.clone()),
                    _ => std::env::var(name).ok(),
                },
                &cwd,
            )
        }
        None => RunConfig::load_with(|name| std::env::var(name).ok(), &cwd),
    }
}

fn describe_source(source: &RunConfigSource) -> String {
    match source {
        RunConfigSource::Default => "built-in defaults".to_string(),
        RunConfigSource::EnvPath(path) => format!("{} (via {CONFIG_PATH_ENV})", path.display()),
        RunConfigSource::EnvInline => "inline JSON".to_string(),
        RunConfigSource::File(path) => path.display().to_string(),
    }
}

async fn run(seeds: Vec<Seed>, config: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let (config, source) = load_config(config)?;
    info!(source = %describe_source(&source), "configuration loaded");

    let merged = config
        .module_options()
        .context("invalid module options")?;
    for key in &merged.ignored_keys {
        warn!(key = key.as_str(), "ignoring unrecognized option");
    }

    let client = HttpSourceClient::new(&config.source_settings(), &merged.options.credential)
        .context("failed to build source client")?;

    let stop = CancellationToken::new();
    let processor = EventProcessor::new(merged.options, client, stop.clone());
    let mut runner = ScanRunner::new(processor, stop.clone());

    let ctrl_c = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current lookup");
            ctrl_c.cancel();
        }
    });

    let seeds: Vec<Event> = seeds
        .into_iter()
        .map(|seed| Event::seed(seed.event_type, seed.data, SEED_PRODUCER))
        .collect();
    let emitted = runner.run(seeds).await;
    info!(emitted, "scan finished");

    print_log(runner.log(), format)
}

fn print_log(log: &EventLog, format: OutputFormat) -> Result<()> {
    for event in log.iter() {
        match format {
            OutputFormat::Text => {
                let depth = log.lineage(event.id()).len().saturating_sub(1);
                println!(
                    "{:indent$}{} {}",
                    "",
                    event.event_type(),
                    event.data(),
                    indent = depth * 2
                );
            }
            OutputFormat::Jsonl => {
                let line = serde_json::to_string(event).context("failed to encode event")?;
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn describe(json: bool) -> Result<()> {
    let descriptor = descriptor(&ModuleOptions::default());

    if json {
        let rendered = serde_json::to_string_pretty(&descriptor)
            .context("failed to encode descriptor")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} ({})", descriptor.title, descriptor.name);
    println!("{}", descriptor.summary);
    println!("category: {}", descriptor.category);
    println!("watches:");
    for event_type in &descriptor.watched {
        println!("  {event_type}");
    }
    println!("produces:");
    for event_type in descriptor.produced {
        println!("  {event_type}");
    }
    println!("options:");
    for (name, summary) in ModuleOptions::describe() {
        println!("  {name:<17} {summary}");
    }
    Ok(())
}

fn check_config(config: Option<PathBuf>) -> Result<()> {
    let (config, source) = load_config(config)?;
    println!("source: {}", describe_source(&source));

    let merged = match config.module_options() {
        Ok(merged) => merged,
        Err(err) => bail!("invalid module options: {err}"),
    };
    for key in &merged.ignored_keys {
        println!("warning: unrecognized option {key:?} will be ignored");
    }
    if !merged.options.has_credential() {
        println!("warning: no api_key configured; the unit will disable itself");
    }
    HttpSourceClient::new(&config.source_settings(), &merged.options.credential)
        .context("invalid source settings")?;

    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
