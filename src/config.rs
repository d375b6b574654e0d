use dioxus_logger::tracing::Level;
use std::{fmt, str::FromStr, time::Duration};
use url::Url;

use crate::{error::config::ConfigError, service::normalizer::NormalizeOptions};

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Default pacing bounds; every page request waits a random delay in this range.
const DEFAULT_PACING_MIN_MS: u64 = 50;
const DEFAULT_PACING_MAX_MS: u64 = 350;

/// Opaque bearer value attached to every request.
///
/// Read-only for the lifetime of the process and shared across all concurrent
/// walks. `Debug` output is redacted so the token never reaches the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

pub struct Config {
    pub credential: Credential,
    pub api_base: Url,

    pub pacing_min: Duration,
    pub pacing_max: Duration,
    pub concurrency: usize,

    pub normalize: NormalizeOptions,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `DISCORD_TOKEN` is required; a missing token is the one fatal startup
    /// error. Every other variable falls back to a default when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string()))?;

        let api_base_raw =
            lookup("DISCORD_API_BASE").unwrap_or_else(|| DISCORD_API_BASE.to_string());
        let api_base = Url::parse(&api_base_raw).map_err(|_| ConfigError::InvalidEnvVar {
            name: "DISCORD_API_BASE".to_string(),
            value: api_base_raw.clone(),
        })?;

        let pacing_min_ms = parse_or(&lookup, "HISTORY_PACING_MIN_MS", DEFAULT_PACING_MIN_MS)?;
        let pacing_max_ms = parse_or(&lookup, "HISTORY_PACING_MAX_MS", DEFAULT_PACING_MAX_MS)?;
        if pacing_min_ms > pacing_max_ms {
            return Err(ConfigError::InvalidEnvVar {
                name: "HISTORY_PACING_MIN_MS".to_string(),
                value: pacing_min_ms.to_string(),
            });
        }

        let concurrency: usize = parse_or(&lookup, "HISTORY_CONCURRENCY", 1)?;
        if concurrency == 0 {
            return Err(ConfigError::InvalidEnvVar {
                name: "HISTORY_CONCURRENCY".to_string(),
                value: "0".to_string(),
            });
        }

        let include_deleted = parse_or(&lookup, "HISTORY_INCLUDE_DELETED", false)?;
        let log_level = parse_or(&lookup, "HISTORY_LOG_LEVEL", Level::INFO)?;

        Ok(Self {
            credential: Credential::new(token),
            api_base,
            pacing_min: Duration::from_millis(pacing_min_ms),
            pacing_max: Duration::from_millis(pacing_max_ms),
            concurrency,
            normalize: NormalizeOptions {
                include_deleted,
                ..NormalizeOptions::default()
            },
            log_level,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn missing_token_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DISCORD_TOKEN"));

        let blank = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "  ")]));
        assert!(matches!(blank, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();

        assert_eq!(config.credential.expose(), "abc");
        assert_eq!(config.api_base.as_str(), "https://discord.com/api/v10");
        assert_eq!(config.pacing_min, Duration::from_millis(50));
        assert_eq!(config.pacing_max, Duration::from_millis(350));
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.normalize, NormalizeOptions::default());
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_API_BASE", "http://localhost:8080/api"),
            ("HISTORY_PACING_MIN_MS", "0"),
            ("HISTORY_PACING_MAX_MS", "10"),
            ("HISTORY_CONCURRENCY", "4"),
            ("HISTORY_INCLUDE_DELETED", "true"),
            ("HISTORY_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.api_base.as_str(), "http://localhost:8080/api");
        assert_eq!(config.pacing_max, Duration::from_millis(10));
        assert_eq!(config.concurrency, 4);
        assert!(config.normalize.include_deleted);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn rejects_invalid_values() {
        let inverted = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("HISTORY_PACING_MIN_MS", "500"),
            ("HISTORY_PACING_MAX_MS", "100"),
        ]));
        assert!(matches!(inverted, Err(ConfigError::InvalidEnvVar { .. })));

        let zero = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("HISTORY_CONCURRENCY", "0"),
        ]));
        assert!(matches!(zero, Err(ConfigError::InvalidEnvVar { .. })));

        let bad_url = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_API_BASE", "not a url"),
        ]));
        assert!(matches!(bad_url, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("super-secret");
        assert!(!format!("{:?}", credential).contains("super-secret"));
    }
}
