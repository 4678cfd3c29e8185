use std::time::Duration;

use url::Url;

use crate::errors::{BotError, BotResult};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
const DEFAULT_POLL_MAX_RETRIES: u32 = 3;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30 * 60;
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
/// Upper bound for every `*_SECS` setting (one day).
const MAX_SECS: u64 = 24 * 60 * 60;
const MAX_POLL_RETRIES: u32 = 100;

/// Runtime settings read from the environment (and `.env`).
#[derive(Clone)]
pub struct Config {
    pub telegram_token: String,
    pub api_base_url: Url,
    pub api_key: String,
    pub api_timeout: Duration,
    pub poll_interval: Duration,
    pub poll_max_retries: u32,
    pub poll_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_timeout", &self.api_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("poll_max_retries", &self.poll_max_retries)
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BotResult<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let telegram_token = non_empty("TELOXIDE_TOKEN")
            .or_else(|| non_empty("TELEGRAM_TOKEN"))
            .ok_or_else(|| BotError::config("Telegram token not found (TELOXIDE_TOKEN)"))?;

        let api_key = non_empty("VIDEO_API_KEY")
            .ok_or_else(|| BotError::config("Video API key not found (VIDEO_API_KEY)"))?;

        let raw_base = non_empty("API_BASE_URL")
            .ok_or_else(|| BotError::config("API base URL not found (API_BASE_URL)"))?;
        let api_base_url = Url::parse(raw_base.trim())
            .map_err(|e| BotError::config(format!("API_BASE_URL is invalid: {}", e)))?;

        let secs = |key: &str, default: u64| -> BotResult<Duration> {
            let value = match non_empty(key) {
                Some(v) => v
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| BotError::config(format!("{} must be a number, got '{}'", key, v)))?,
                None => default,
            };
            if !(1..=MAX_SECS).contains(&value) {
                return Err(BotError::config(format!(
                    "{} must be between 1 and {}, got {}",
                    key, MAX_SECS, value
                )));
            }
            Ok(Duration::from_secs(value))
        };

        let poll_max_retries = match non_empty("POLL_MAX_RETRIES") {
            Some(v) => v.trim().parse().map_err(|_| {
                BotError::config(format!("POLL_MAX_RETRIES must be a number, got '{}'", v))
            })?,
            None => DEFAULT_POLL_MAX_RETRIES,
        };
        if !(1..=MAX_POLL_RETRIES).contains(&poll_max_retries) {
            return Err(BotError::config(format!(
                "POLL_MAX_RETRIES must be between 1 and {}",
                MAX_POLL_RETRIES
            )));
        }

        Ok(Self {
            telegram_token,
            api_base_url,
            api_key,
            api_timeout: secs("API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?,
            poll_interval: secs("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            poll_max_retries,
            poll_timeout: secs("POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS)?,
        })
    }
}
