use crate::models::RankMode;
use crate::services::ranking::decay::{Decay, DEFAULT_INTERVAL_MS, DEFAULT_WEIGHT};
use crate::services::snapshot::MAX_CLIP_RESULTS;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid trending decay config: {0}")]
    Decay(#[from] envy::Error),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub ranking: RankingConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Mode the process starts in; may be toggled at runtime.
    pub default_mode: RankMode,
    pub decay: Decay,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub snapshot_path: String,
    pub max_clip_results: usize,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayKind {
    Linear,
    Logarithmic,
}

/// `TRENDING_*` environment section.
#[derive(Debug, Clone, Deserialize)]
pub struct DecayConfig {
    #[serde(default = "default_decay_kind")]
    pub decay: DecayKind,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: i64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_decay_kind() -> DecayKind {
    DecayKind::Linear
}

fn default_interval_ms() -> i64 {
    DEFAULT_INTERVAL_MS
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl DecayConfig {
    pub fn into_decay(self) -> Result<Decay, ConfigError> {
        if self.interval_ms <= 0 {
            return Err(ConfigError::Invalid {
                key: "TRENDING_INTERVAL_MS",
                reason: format!("must be positive, got {}", self.interval_ms),
            });
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ConfigError::Invalid {
                key: "TRENDING_WEIGHT",
                reason: format!("must be a finite non-negative number, got {}", self.weight),
            });
        }

        Ok(match self.decay {
            DecayKind::Linear => Decay::linear(self.interval_ms, self.weight),
            DecayKind::Logarithmic => Decay::logarithmic(self.interval_ms, self.weight),
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::from_vars(&vars)
    }

    /// Build the config from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let default_mode = parse_var(vars, "RANK_MODE", RankMode::default())?;

        let fetch_timeout_ms = parse_var(vars, "FETCH_TIMEOUT_MS", 10_000u64)?;

        let trending = vars.iter().filter_map(|(key, value)| {
            key.strip_prefix("TRENDING_")
                .map(|stripped| (stripped.to_string(), value.clone()))
        });
        let decay = envy::from_iter::<_, DecayConfig>(trending)?.into_decay()?;

        let log_format = match vars.get("LOG_FORMAT") {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Config {
            service: ServiceConfig {
                service_name: vars
                    .get("SERVICE_NAME")
                    .cloned()
                    .unwrap_or_else(|| "clip-ranking-service".to_string()),
                log_format,
            },
            ranking: RankingConfig {
                default_mode,
                decay,
            },
            feed: FeedConfig {
                snapshot_path: vars
                    .get("SNAPSHOT_PATH")
                    .cloned()
                    .unwrap_or_else(|| "clips.json".to_string()),
                max_clip_results: parse_var(vars, "MAX_CLIP_RESULTS", MAX_CLIP_RESULTS)?,
                fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            },
        })
    }
}

fn parse_var<T>(
    vars: &HashMap<String, String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
