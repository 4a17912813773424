use crate::errors::ConfigError;
use crate::timer::DurationMinutes;
use reqwest::Url;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/focus_stats.json";
const DEFAULT_SESSION_ENDPOINT: &str = "http://127.0.0.1:8000/pomodoro/";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub session_endpoint: Url,
    /// Raw `Cookie` header forwarded to the session endpoint.
    pub session_cookies: Option<String>,
    pub default_duration: DurationMinutes,
    pub chime: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
                expected: "a TCP port number",
            })?,
            None => DEFAULT_PORT,
        };

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let endpoint = lookup("SESSION_ENDPOINT").unwrap_or_else(|| DEFAULT_SESSION_ENDPOINT.to_string());
        let session_endpoint = Url::parse(&endpoint).map_err(|_| ConfigError::Invalid {
            name: "SESSION_ENDPOINT",
            value: endpoint.clone(),
            expected: "an absolute URL",
        })?;

        let session_cookies = lookup("SESSION_COOKIES").filter(|value| !value.trim().is_empty());

        let default_duration = match lookup("FOCUS_DEFAULT_MINUTES") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .and_then(|minutes| DurationMinutes::try_from(minutes).ok())
                .ok_or(ConfigError::Invalid {
                    name: "FOCUS_DEFAULT_MINUTES",
                    value,
                    expected: "one of 15, 25, 30, 45, 60",
                })?,
            None => DurationMinutes::default(),
        };

        let chime = match lookup("FOCUS_CHIME").as_deref() {
            None | Some("bell") => true,
            Some("off") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "FOCUS_CHIME",
                    value: other.to_string(),
                    expected: "\"bell\" or \"off\"",
                });
            }
        };

        Ok(Self {
            port,
            data_path,
            session_endpoint,
            session_cookies,
            default_duration,
            chime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/focus_stats.json"));
        assert_eq!(config.session_endpoint.path(), "/pomodoro/");
        assert_eq!(config.session_cookies, None);
        assert_eq!(config.default_duration.get(), 25);
        assert!(config.chime);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("APP_DATA_PATH", "/tmp/focus.json"),
            ("SESSION_ENDPOINT", "https://tracker.example/pomodoro/"),
            ("SESSION_COOKIES", "csrftoken=abc"),
            ("FOCUS_DEFAULT_MINUTES", "45"),
            ("FOCUS_CHIME", "off"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.session_endpoint.host_str(), Some("tracker.example"));
        assert_eq!(config.session_cookies.as_deref(), Some("csrftoken=abc"));
        assert_eq!(config.default_duration.get(), 45);
        assert!(!config.chime);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("SESSION_ENDPOINT", "not a url")]).is_err());
        assert!(config(&[("FOCUS_DEFAULT_MINUTES", "20")]).is_err());
        assert!(config(&[("FOCUS_CHIME", "loud")]).is_err());
    }
}
