use config::{Config, ConfigError, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::client::dsn::Dsn;
use crate::error::{PayloadError, RunError};
use crate::runner::chunker::DEFAULT_MAX_CHARS;

/// Persistent settings: defaults, then a settings file, then `RAVEN_SH_*` variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub dsn: Option<String>,
    pub language: String,
    pub chunk_max_chars: usize,
    pub timeout_secs: u64,
    pub server_name: Option<String>,
    pub environment: Option<String>,
    pub release: Option<String>,
}

impl Settings {
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv().ok();

        let mut builder = Config::builder()
            .set_default("dsn", None::<String>)?
            .set_default("language", "en")?
            .set_default("chunk_max_chars", DEFAULT_MAX_CHARS as u64)?
            .set_default("timeout_secs", 10)?
            .set_default("server_name", None::<String>)?
            .set_default("environment", None::<String>)?
            .set_default("release", None::<String>)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => match default_config_base() {
                Some(base) => {
                    debug!(path = %base.display(), "Looking for settings file");
                    builder.add_source(File::with_name(&base.to_string_lossy()).required(false))
                }
                None => builder,
            },
        };

        let config = builder
            .add_source(Environment::with_prefix("RAVEN_SH").try_parsing(true))
            .build()?;
        let mut settings: Settings = config.try_deserialize()?;
        settings.apply_sentry_env(|key| env::var(key).ok());

        Ok(settings)
    }

    /// Fills unset fields from the variables the Sentry SDKs understand.
    fn apply_sentry_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.dsn.as_deref().is_none_or(str::is_empty) {
            self.dsn = lookup("SENTRY_DSN");
        }
        if self.environment.is_none() {
            self.environment = lookup("SENTRY_ENVIRONMENT");
        }
        if self.release.is_none() {
            self.release = lookup("SENTRY_RELEASE");
        }
    }
}

fn default_config_base() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("raven-sh").join("config"))
}

/// Decodes the value of a JSON option such as `--extra`.
pub fn decode_json_object(option: &'static str, raw: &str) -> Result<Map<String, Value>, PayloadError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| PayloadError::InvalidJson {
        option,
        raw: raw.to_string(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PayloadError::NotAnObject {
            option,
            raw: raw.to_string(),
        }),
    }
}

/// Everything one invocation needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dsn: Option<Dsn>,
    pub debug: bool,
    pub message: Option<String>,
    pub extra: Map<String, Value>,
    pub tags: Map<String, Value>,
    pub command: Vec<String>,
    pub chunk_max_chars: usize,
    pub timeout: Duration,
    pub server_name: Option<String>,
    pub environment: Option<String>,
    pub release: Option<String>,
}

impl RunConfig {
    /// Validates in the order users hit problems: JSON options, DSN, command.
    pub fn build(settings: Settings, cli: Cli) -> Result<Self, RunError> {
        let extra = match cli.extra.as_deref() {
            Some(raw) => decode_json_object("--extra", raw)?,
            None => Map::new(),
        };
        let tags = match cli.tags.as_deref() {
            Some(raw) => decode_json_object("--tags", raw)?,
            None => Map::new(),
        };

        let raw_dsn = cli
            .dsn
            .filter(|d| !d.is_empty())
            .or(settings.dsn.filter(|d| !d.is_empty()));
        let dsn = match raw_dsn {
            Some(raw) => Some(raw.parse::<Dsn>()?),
            None if cli.debug => {
                warn!("{}", RunError::MissingDsn);
                None
            }
            None => return Err(RunError::MissingDsn),
        };

        if cli.command.is_empty() {
            return Err(RunError::MissingCommand);
        }

        if settings.chunk_max_chars == 0 {
            return Err(RunError::ZeroChunkSize);
        }

        Ok(Self {
            dsn,
            debug: cli.debug,
            message: cli.message,
            extra,
            tags,
            command: cli.command,
            chunk_max_chars: settings.chunk_max_chars,
            timeout: Duration::from_secs(settings.timeout_secs),
            server_name: settings.server_name,
            environment: settings.environment,
            release: settings.release,
        })
    }
}
