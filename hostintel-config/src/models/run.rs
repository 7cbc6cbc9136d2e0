use anyhow::{Context, anyhow};
use hostintel_core::{
    MergedOptions, ModuleOptions, OptionsError, SourceSettings, source::http,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable holding a path to a TOML or JSON config file.
pub const CONFIG_PATH_ENV: &str = "HOSTINTEL_CONFIG_PATH";
/// Environment variable holding an inline JSON config.
pub const CONFIG_JSON_ENV: &str = "HOSTINTEL_CONFIG_JSON";
/// Environment variable that supplies the source credential.
pub const API_KEY_ENV: &str = "HOSTINTEL_API_KEY";

const DEFAULT_FILES: &[&str] = &[
    "hostintel.toml",
    "hostintel.json",
    "config/hostintel.toml",
];

/// Where the run configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Settings for one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Option overrides keyed by their external names (`api_key`,
    /// `maxnetblock`, ...). Anything left out keeps its default.
    pub module: Map<String, Value>,
    pub source: SourceConfig,
}

/// Transport settings for the host-intelligence source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL template with `{key}` and `{credential}` placeholders.
    pub endpoint: String,
    /// Per-request timeout, written as a humantime string (`"30s"`).
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: http::DEFAULT_ENDPOINT.to_string(),
            timeout: http::DEFAULT_TIMEOUT,
            user_agent: http::CLIENT_IDENTITY.to_string(),
        }
    }
}

impl From<&SourceConfig> for SourceSettings {
    fn from(config: &SourceConfig) -> Self {
        SourceSettings {
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl RunConfig {
    /// Load the run configuration using environment variables.
    /// Evaluation order:
    /// 1) `$HOSTINTEL_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$HOSTINTEL_CONFIG_JSON` (inline JSON),
    /// 3) `hostintel.toml`, `hostintel.json` or `config/hostintel.toml`
    ///    in the working directory,
    /// 4) defaults.
    ///
    /// `$HOSTINTEL_API_KEY` then overrides `module.api_key` when set.
    pub fn load_from_env() -> anyhow::Result<(Self, RunConfigSource)> {
        let cwd = std::env::current_dir()
            .context("failed to resolve working directory")?;
        Self::load_with(|name| std::env::var(name).ok(), &cwd)
    }

    /// Same as [`RunConfig::load_from_env`] with an injectable environment
    /// and base directory.
    pub fn load_with(
        env: impl Fn(&str) -> Option<String>,
        base: &Path,
    ) -> anyhow::Result<(Self, RunConfigSource)> {
        let set = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let (mut config, source) = if let Some(path) = set(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            (Self::load_from_file(&path)?, RunConfigSource::EnvPath(path))
        } else if let Some(raw) = set(CONFIG_JSON_ENV) {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            (parsed, RunConfigSource::EnvInline)
        } else if let Some(path) = Self::find_default_file(base) {
            (Self::load_from_file(&path)?, RunConfigSource::File(path))
        } else {
            (Self::default(), RunConfigSource::Default)
        };

        if let Some(key) = set(API_KEY_ENV) {
            config.module.insert("api_key".into(), Value::String(key));
        }

        Ok((config, source))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read run config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid run config {}", path.display())),
            Some("toml") | Some("tml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid run config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // TOML first, then JSON.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse run config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid run config json: {err}"))
    }

    /// Module options with the overrides applied over defaults.
    pub fn module_options(&self) -> Result<MergedOptions, OptionsError> {
        ModuleOptions::default().merged(&self.module)
    }

    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings::from(&self.source)
    }

    /// Render as TOML with the credential masked.
    pub fn to_redacted_toml(&self) -> anyhow::Result<String> {
        let mut redacted = self.clone();
        if let Some(key) = redacted.module.get_mut("api_key")
            && key.as_str().is_some_and(|key| !key.is_empty())
        {
            *key = Value::String("<redacted>".into());
        }
        toml::to_string_pretty(&redacted).context("failed to render run config")
    }

    fn find_default_file(base: &Path) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|candidate| base.join(candidate))
            .find(|path| path.exists())
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(D::Error::custom)
    }
}
