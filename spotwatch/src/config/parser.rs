//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::{ConfigFile, OnFetchFailure};
use crate::geo::DistanceUnit;

/// Parses an `Ini` into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values present.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [poll]
    if let Some(section) = ini.section(Some("poll")) {
        if let Some(v) = section.get("interval") {
            config.poll.interval = positive_secs("poll", "interval", v)?;
        }
        if let Some(v) = section.get("sleep_at") {
            config.poll.sleep_at = hour("poll", "sleep_at", v)?;
        }
        if let Some(v) = section.get("wake_at") {
            config.poll.wake_at = hour("poll", "wake_at", v)?;
        }
    }

    // [feed]
    if let Some(section) = ini.section(Some("feed")) {
        if let Some(v) = non_empty(section, "url") {
            config.feed.url = v;
        }
        config.feed.api_key = non_empty(section, "api_key");
        if let Some(v) = non_empty(section, "api_host") {
            config.feed.api_host = v;
        }
        if let Some(v) = section.get("timeout") {
            config.feed.timeout = positive_secs("feed", "timeout", v)?;
        }
        if let Some(v) = section.get("on_failure") {
            config.feed.on_failure = OnFetchFailure::from_str(v).map_err(|_| {
                invalid("feed", "on_failure", v, "must be 'skip' or 'reuse'")
            })?;
        }
        if let Some(v) = section.get("reuse_max_age") {
            config.feed.reuse_max_age = positive_secs("feed", "reuse_max_age", v)?;
        }
    }

    // [store]
    if let Some(section) = ini.section(Some("store")) {
        if let Some(v) = non_empty(section, "directory") {
            config.store.directory = expand_tilde(&v);
        }
        if let Some(v) = section.get("timeout") {
            config.store.timeout = positive_secs("store", "timeout", v)?;
        }
    }

    // [notify]
    if let Some(section) = ini.section(Some("notify")) {
        config.notify.endpoint = non_empty(section, "endpoint");
        config.notify.server_key = non_empty(section, "server_key");
        if let Some(v) = section.get("timeout") {
            config.notify.timeout = positive_secs("notify", "timeout", v)?;
        }
    }

    // [engine]
    if let Some(section) = ini.section(Some("engine")) {
        if let Some(v) = section.get("concurrency") {
            config.engine.concurrency = match v.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(invalid(
                        "engine",
                        "concurrency",
                        v,
                        "must be a positive integer",
                    ))
                }
            };
        }
        if let Some(v) = section.get("ground_marker") {
            config.engine.ground_marker = v.trim().to_string();
        }
        if let Some(v) = section.get("distance_unit") {
            config.engine.distance_unit = v.parse::<DistanceUnit>().map_err(|_| {
                invalid("engine", "distance_unit", v, "must be 'nm', 'km' or 'mi'")
            })?;
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(section: &Properties, key: &str) -> Option<String> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn positive_secs(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(
            section,
            key,
            value,
            "must be a positive integer (seconds)",
        )),
    }
}

fn hour(section: &str, key: &str, value: &str) -> Result<u32, ConfigFileError> {
    match value.trim().parse::<u32>() {
        Ok(h) if h <= 23 => Ok(h),
        _ => Err(invalid(section, key, value, "must be an hour between 0 and 23")),
    }
}

/// Expands a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
