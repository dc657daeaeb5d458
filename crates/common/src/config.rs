use std::{env, fmt, time::Duration};

use chrono::TimeDelta;
use thiserror::Error;

pub const DEFAULT_PAIRS_URL: &str = "https://api.dexscreener.com/latest/dex/pairs/polygon";
pub const DEFAULT_PAIR_URL: &str = "https://dexscreener.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Signal rules. Fixed in code; not read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub quote_symbol: String,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    pub buy_profit_multiplier: f64,
    pub chain_label: String,
    pub fallback_url: String,
    pub buy_window: TimeDelta,
    pub sell_window_start: TimeDelta,
    pub sell_window_end: TimeDelta,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            quote_symbol: "USDT".to_string(),
            buy_threshold: -1.0,
            sell_threshold: 1.0,
            buy_profit_multiplier: 5.0,
            chain_label: "Polygon".to_string(),
            fallback_url: DEFAULT_PAIR_URL.to_string(),
            buy_window: TimeDelta::minutes(2),
            sell_window_start: TimeDelta::minutes(10),
            sell_window_end: TimeDelta::minutes(18),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub pairs_url: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            pairs_url: DEFAULT_PAIRS_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    pub interval: Duration,
    pub first_delay: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(180),
            first_delay: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub chat_id: i64,
    pub fetch: FetchConfig,
    pub schedule: ScheduleConfig,
    pub signal: SignalConfig,
}

// Keeps the bot token out of logs.
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("fetch", &self.fetch)
            .field("schedule", &self.schedule)
            .field("signal", &self.signal)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_token = lookup("TELEGRAM_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("TELEGRAM_TOKEN"))?;

        let chat_id_raw = lookup("CHAT_ID").ok_or(ConfigError::Missing("CHAT_ID"))?;
        let chat_id = chat_id_raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::Invalid {
                key: "CHAT_ID",
                value: chat_id_raw.clone(),
            })?;

        let mut fetch = FetchConfig::default();
        if let Some(url) = lookup("DEXSCREENER_URL") {
            fetch.pairs_url = url;
        }
        if let Some(secs) = parse_secs(&lookup, "HTTP_TIMEOUT_SECS")? {
            fetch.timeout = secs;
        }

        let mut schedule = ScheduleConfig::default();
        if let Some(secs) = parse_secs(&lookup, "SIGNAL_INTERVAL_SECS")? {
            if secs.is_zero() {
                return Err(ConfigError::Invalid {
                    key: "SIGNAL_INTERVAL_SECS",
                    value: "0".to_string(),
                });
            }
            schedule.interval = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "SIGNAL_FIRST_DELAY_SECS")? {
            schedule.first_delay = secs;
        }

        Ok(Self {
            telegram_token,
            chat_id,
            fetch,
            schedule,
            signal: SignalConfig::default(),
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|s| Some(Duration::from_secs(s)))
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
