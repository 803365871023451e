// tagbridge/src/config.rs
//! Bridge configuration: a TOML file with environment overrides, so the
//! access token can stay out of the file on shared machines.

use crate::dispatch::{PayloadMode, RetryPolicy};
use crate::utils::DEFAULT_READ_TIMEOUT_MS;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable names recognized as overrides.
pub mod env_vars {
    pub const HA_URL: &str = "TAGBRIDGE_HA_URL";
    pub const HA_TOKEN: &str = "TAGBRIDGE_HA_TOKEN";
    pub const SERIAL_PORT: &str = "TAGBRIDGE_SERIAL_PORT";
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Identifier this bridge reports as `device_id` in events.
    #[serde(default = "default_device_id")]
    pub device_id: String,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub poll: PollConfig,
    pub home_assistant: HomeAssistantConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerialConfig {
    /// Serial device path. When absent, USB serial ports are probed.
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Pause between poll cycles.
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomeAssistantConfig {
    /// Base URL of the Home Assistant instance, without the API path.
    pub base_url: String,
    /// Long-lived access token. Prefer the TAGBRIDGE_HA_TOKEN variable.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub payload_mode: PayloadMode,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    #[serde(default = "default_retry_base_ms")]
    pub base_ms: u64,
    #[serde(default = "default_retry_cap_ms")]
    pub cap_ms: u64,
    #[serde(default = "default_retry_max_attempts")]
    pub max_attempts: u32,
}

fn default_device_id() -> String {
    "tagbridge".to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_retry_base_ms() -> u64 {
    500
}

fn default_retry_cap_ms() -> u64 {
    30_000
}

fn default_retry_max_attempts() -> u32 {
    5
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_ms: default_retry_base_ms(),
            cap_ms: default_retry_cap_ms(),
            max_attempts: default_retry_max_attempts(),
        }
    }
}

impl Config {
    /// Load from a TOML file, apply environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content without touching the environment.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(env_vars::HA_URL) {
            self.home_assistant.base_url = url;
        }
        if let Ok(token) = std::env::var(env_vars::HA_TOKEN) {
            self.home_assistant.token = token;
        }
        if let Ok(port) = std::env::var(env_vars::SERIAL_PORT) {
            self.serial.port = Some(port);
        }
    }

    /// Reject configurations that cannot work, before any hardware or
    /// network is touched.
    pub fn validate(&self) -> Result<()> {
        if self.home_assistant.base_url.trim().is_empty() {
            return Err(Error::Config("home_assistant.base_url is empty".into()));
        }
        if self.home_assistant.token.trim().is_empty() {
            return Err(Error::Config(format!(
                "home_assistant.token is empty (set it in the file or via {})",
                env_vars::HA_TOKEN
            )));
        }
        if self.poll.interval_ms == 0 {
            return Err(Error::Config("poll.interval_ms must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config("retry.max_attempts must be positive".into()));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        crate::utils::ms(self.serial.read_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        crate::utils::ms(self.poll.interval_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base: crate::utils::ms(self.retry.base_ms),
            cap: crate::utils::ms(self.retry.cap_ms),
            max_attempts: self.retry.max_attempts,
        }
    }
}
