//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_PRICES_URL: &str = "https://interview.switcheo.com/prices.json";
pub const DEFAULT_TOKEN_ICONS_BASE_URL: &str =
    "https://raw.githubusercontent.com/Switcheo/token-icons/main/tokens";

/// Notional ceiling for a single swap, in USD.
pub const DEFAULT_MAX_AMOUNT_USD: f64 = 15_000_000.0;

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON endpoint serving the price records.
    pub prices_url: String,
    /// Base path for per-symbol SVG icons.
    pub icons_base_url: String,
    /// Request timeout for both price and icon fetches.
    pub http_timeout: Duration,
    /// How many times the binary reloads the catalog after a failed load.
    pub catalog_reloads: u32,
    pub validation: ValidationConfig,
    pub submission: SubmissionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prices_url: DEFAULT_PRICES_URL.to_string(),
            icons_base_url: DEFAULT_TOKEN_ICONS_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            catalog_reloads: 1,
            validation: ValidationConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to the
    /// built-in defaults for anything unset.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let prices_url = env_or("PRICES_URL", defaults.prices_url);
        let icons_base_url = env_or("TOKEN_ICONS_BASE_URL", defaults.icons_base_url);
        Url::parse(&prices_url)?;
        Url::parse(&icons_base_url)?;

        let http_timeout = match std::env::var("HTTP_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse()?),
            Err(_) => defaults.http_timeout,
        };
        let catalog_reloads = match std::env::var("CATALOG_RELOADS") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.catalog_reloads,
        };

        let max_amount_usd = match std::env::var("MAX_AMOUNT_USD") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.validation.max_amount_usd,
        };
        let validation = ValidationConfig { max_amount_usd };

        let mut submission = defaults.submission;
        if let Ok(v) = std::env::var("SWAP_SUCCESS_RATE") {
            submission.success_rate = v.parse()?;
        }
        if let Ok(v) = std::env::var("SWAP_MIN_DELAY_MS") {
            submission.min_delay = Duration::from_millis(v.parse()?);
        }
        if let Ok(v) = std::env::var("SWAP_MAX_DELAY_MS") {
            submission.max_delay = Duration::from_millis(v.parse()?);
        }

        let cfg = Self {
            prices_url,
            icons_base_url,
            http_timeout,
            catalog_reloads,
            validation,
            submission,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.validation.validate()?;
        self.submission.validate()
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Limits applied by the form validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationConfig {
    pub max_amount_usd: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_amount_usd: DEFAULT_MAX_AMOUNT_USD,
        }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.max_amount_usd.is_finite() || self.max_amount_usd <= 0.0 {
            return Err(AppError::Config(format!(
                "MAX_AMOUNT_USD must be a positive number, got {}",
                self.max_amount_usd
            )));
        }
        Ok(())
    }
}

/// Latency and flakiness of the simulated swap backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionConfig {
    /// Probability in `[0, 1]` that a submission succeeds.
    pub success_rate: f64,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            success_rate: 0.9,
            min_delay: Duration::from_millis(2000),
            max_delay: Duration::from_millis(3000),
        }
    }
}

impl SubmissionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.success_rate) {
            return Err(AppError::Config(format!(
                "SWAP_SUCCESS_RATE must be within [0, 1], got {}",
                self.success_rate
            )));
        }
        if self.min_delay > self.max_delay {
            return Err(AppError::Config(format!(
                "SWAP_MIN_DELAY_MS ({}ms) exceeds SWAP_MAX_DELAY_MS ({}ms)",
                self.min_delay.as_millis(),
                self.max_delay.as_millis()
            )));
        }
        Ok(())
    }
}
