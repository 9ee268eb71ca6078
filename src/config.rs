use std::env;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::Key;
use anyhow::{bail, Context};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Session keys shorter than this are rejected by `Key::from`.
const SESSION_KEY_MIN_LENGTH: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub account_service_url: String,
    pub account_service_timeout: Duration,
    pub session_key: Option<String>,
    pub translations_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a port number, got `{port}`"))?,
            None => DEFAULT_PORT,
        };

        let timeout = match lookup("ACCOUNT_SERVICE_TIMEOUT_SECS") {
            Some(secs) => secs.parse().with_context(|| {
                format!("ACCOUNT_SERVICE_TIMEOUT_SECS must be a number of seconds, got `{secs}`")
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout == 0 {
            bail!("ACCOUNT_SERVICE_TIMEOUT_SECS must be greater than zero");
        }

        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        Ok(Config {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            account_service_url: lookup("ACCOUNT_SERVICE_URL")
                .context("ACCOUNT_SERVICE_URL must be set")?,
            account_service_timeout: Duration::from_secs(timeout),
            session_key: lookup("SESSION_KEY"),
            translations_dir: lookup("TRANSLATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| root.join("translations")),
            templates_dir: lookup("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| root.join("templates")),
        })
    }

    /// The configured cookie signing key, or a random one that won't survive a restart.
    pub fn session_key(&self) -> Key {
        match &self.session_key {
            Some(key) if key.len() >= SESSION_KEY_MIN_LENGTH => Key::from(key.as_bytes()),
            Some(_) => {
                log::warn!(
                    "SESSION_KEY is shorter than {SESSION_KEY_MIN_LENGTH} bytes, using a random key"
                );
                Key::generate()
            }
            None => {
                log::warn!("SESSION_KEY is not set, sessions will not survive a restart");
                Key::generate()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("ACCOUNT_SERVICE_URL", "http://accounts.local/api")]).unwrap();

        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.account_service_url, "http://accounts.local/api");
        assert_eq!(config.account_service_timeout, Duration::from_secs(10));
        assert!(config.translations_dir.ends_with("translations"));
        assert!(config.templates_dir.ends_with("templates"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("ACCOUNT_SERVICE_URL", "http://accounts.local"),
            ("BIND_ADDRESS", "0.0.0.0"),
            ("PORT", "9000"),
            ("ACCOUNT_SERVICE_TIMEOUT_SECS", "3"),
            ("TEMPLATES_DIR", "/srv/templates"),
        ])
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.account_service_timeout, Duration::from_secs(3));
        assert_eq!(config.templates_dir, PathBuf::from("/srv/templates"));
    }

    #[test]
    fn test_account_service_url_is_required() {
        let err = config(&[]).unwrap_err();

        assert!(err.to_string().contains("ACCOUNT_SERVICE_URL"));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(config(&[("ACCOUNT_SERVICE_URL", "http://a"), ("PORT", "http")]).is_err());
        assert!(config(&[
            ("ACCOUNT_SERVICE_URL", "http://a"),
            ("ACCOUNT_SERVICE_TIMEOUT_SECS", "0")
        ])
        .is_err());
    }

    #[test]
    fn test_session_key_from_config() {
        let secret = "k".repeat(64);
        let config = config(&[
            ("ACCOUNT_SERVICE_URL", "http://a"),
            ("SESSION_KEY", &secret),
        ])
        .unwrap();

        assert_eq!(config.session_key().master(), Key::from(secret.as_bytes()).master());
    }
}
