//! INI serialization: `ConfigFile` → commented config.ini text.

use super::settings::ConfigFile;

/// Renders a `ConfigFile` as a commented INI document.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.feed.api_key.as_deref().unwrap_or("");
    let endpoint = config.notify.endpoint.as_deref().unwrap_or("");
    let server_key = config.notify.server_key.as_deref().unwrap_or("");

    format!(
        r#"[poll]
; Seconds between feed polls
interval = {}
; Local hour (0-23) at which polling stops for the night
sleep_at = {}
; Local hour (0-23) at which polling resumes. Equal to sleep_at = never sleep
wake_at = {}

[feed]
; ADS-B Exchange endpoint (via RapidAPI)
url = {}
; RapidAPI key (required)
api_key = {}
api_host = {}
; Request timeout in seconds
timeout = {}
; What to do when the feed cannot be fetched:
;   skip  - skip the cycle, touch nothing
;   reuse - reconcile against the last good snapshot if younger than reuse_max_age
on_failure = {}
reuse_max_age = {}

[store]
; Directory holding subscribers.json and spots.json
directory = {}
; Per-operation timeout in seconds
timeout = {}

[notify]
; Push endpoint. If empty, notifications are only written to the log
endpoint = {}
; Sent as "Authorization: key=<server_key>"
server_key = {}
timeout = {}

[engine]
; Subscribers reconciled concurrently
concurrency = {}
; Aircraft whose type contains this marker never trigger alerts. Empty disables
ground_marker = {}
; Unit of subscriber radii: nm, km or mi
distance_unit = {}
"#,
        config.poll.interval,
        config.poll.sleep_at,
        config.poll.wake_at,
        config.feed.url,
        api_key,
        config.feed.api_host,
        config.feed.timeout,
        config.feed.on_failure,
        config.feed.reuse_max_age,
        config.store.directory.display(),
        config.store.timeout,
        endpoint,
        server_key,
        config.notify.timeout,
        config.engine.concurrency,
        config.engine.ground_marker,
        config.engine.distance_unit.suffix(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_ini;
    use crate::config::settings::OnFetchFailure;
    use ini::Ini;

    #[test]
    fn test_written_config_parses_back() {
        let mut config = ConfigFile::default();
        config.poll.interval = 120;
        config.feed.api_key = Some("k".to_string());
        config.feed.on_failure = OnFetchFailure::Reuse;
        config.notify.endpoint = Some("https://push.example/send".to_string());

        let text = to_config_string(&config);
        let parsed = parse_ini(&Ini::load_from_str(&text).unwrap()).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_default_leaves_optional_keys_blank() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("api_key = \n"));
        assert!(text.contains("endpoint = \n"));
        assert!(text.contains("interval = 190\n"));
    }
}
