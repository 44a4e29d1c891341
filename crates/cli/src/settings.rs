//! Layered parameter loading: bundled defaults, optional config file,
//! `STAKESIM_*` environment variables, then command-line overrides.

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File as ConfigFile, FileFormat};
use stakesim_economics::{ParameterMap, ParameterValue};
use std::path::Path;
use std::time::Duration;

/// Defaults shipped with the binary.
pub const BUNDLED_DEFAULTS: &str = include_str!("../defaults.yaml");

/// Environment variable prefix, e.g. `STAKESIM_TOTAL_YEARS=50`.
pub const ENV_PREFIX: &str = "STAKESIM";

/// Playback delay key; not an engine parameter.
pub const SPEED: &str = "speed";

const DEFAULT_SPEED_SECS: f64 = 0.1;

/// Merge every configuration layer into one flat parameter map.
pub fn load_parameters(
    config_path: Option<&Path>,
    overrides: &[(String, ParameterValue)],
) -> Result<ParameterMap> {
    let mut builder =
        Config::builder().add_source(ConfigFile::from_str(BUNDLED_DEFAULTS, FileFormat::Yaml));

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(anyhow!("config file {} does not exist", path.display()));
        }
        builder = builder.add_source(ConfigFile::from(path));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    for (key, value) in overrides {
        builder = match value {
            ParameterValue::Bool(b) => builder.set_override(key.as_str(), *b),
            ParameterValue::Number(n) => builder.set_override(key.as_str(), *n),
            ParameterValue::Text(s) => builder.set_override(key.as_str(), s.as_str()),
        }
        .with_context(|| format!("invalid override for {key}"))?;
    }

    let config = builder.build().context("failed to load configuration")?;
    config
        .try_deserialize::<ParameterMap>()
        .context("configuration must be a flat map of parameter names to values")
}

/// Parse a `key=value` override. Numeric and boolean values are typed;
/// anything else is kept as text.
pub fn parse_override(raw: &str) -> Result<(String, ParameterValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }

    let value = value.trim();
    let value = if let Ok(n) = value.parse::<f64>() {
        ParameterValue::Number(n)
    } else if let Ok(b) = value.parse::<bool>() {
        ParameterValue::Bool(b)
    } else {
        ParameterValue::Text(value.to_string())
    };
    Ok((key.to_ascii_lowercase(), value))
}

/// Delay between rows during animated playback.
pub fn playback_delay(map: &ParameterMap) -> Result<Duration> {
    let secs = match map.get(SPEED) {
        None => DEFAULT_SPEED_SECS,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| anyhow!("{SPEED} must be a number of seconds"))?,
    };
    Duration::try_from_secs_f64(secs).with_context(|| format!("invalid {SPEED}: {secs}"))
}
