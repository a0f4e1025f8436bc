use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::{info, warn};

use crate::dashboard::StatsScope;
use crate::error::ConfigError;

pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub api_url: String,
    pub poll_interval: Duration,
    pub celebration_duration: Duration,
    pub stats_scope: StatsScope,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite:voters.db")?,
            port: try_load("PORT", "3000")?,
            api_url: try_load::<String>("VOTER_API_URL", "http://127.0.0.1:3000")?
                .trim_end_matches('/')
                .to_string(),
            poll_interval: Duration::from_secs(positive_secs("POLL_INTERVAL_SECS", "5")?),
            celebration_duration: Duration::from_secs(positive_secs("CELEBRATION_SECS", "5")?),
            stats_scope: try_load("STATS_SCOPE", "booth")?,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });

    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {} value: {}", key, e);
        ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }
    })
}

fn positive_secs(key: &'static str, default: &str) -> Result<u64, ConfigError> {
    let secs: u64 = try_load(key, default)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(secs)
}
