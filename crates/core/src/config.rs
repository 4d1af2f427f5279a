use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CoreError;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "FINANCE_TRACKER_";

/// Upper bound for `default_range_days` (roughly a century).
pub const MAX_RANGE_DAYS: i64 = 36_500;

/// Application-level configuration, built once at startup and handed to
/// [`crate::FinanceTracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Length of the dashboard/report window when the caller gives no dates.
    pub default_range_days: i64,

    /// Currency shown in rendered reports (e.g., "USD", "EUR", "PLN").
    pub currency: String,

    /// Where renderers put report artifacts before they are delivered and removed.
    pub report_dir: PathBuf,

    /// Optional headless-browser endpoint that turns HTML into PDF.
    pub renderer_url: Option<String>,

    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_range_days: 30,
            currency: "USD".to_string(),
            report_dir: std::env::temp_dir().join("finance-tracker-reports"),
            renderer_url: None,
            log_filter: "info".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Read `FINANCE_TRACKER_*` variables, falling back to defaults.
    ///
    /// - `FINANCE_TRACKER_DEFAULT_RANGE_DAYS`
    /// - `FINANCE_TRACKER_CURRENCY`
    /// - `FINANCE_TRACKER_REPORT_DIR`
    /// - `FINANCE_TRACKER_RENDERER_URL`
    /// - `FINANCE_TRACKER_LOG`
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Same as [`TrackerConfig::from_env`] but reads from an arbitrary source
    /// (keys are given without the prefix).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(days) = lookup("DEFAULT_RANGE_DAYS") {
            config.default_range_days = days.trim().parse().map_err(|_| {
                CoreError::Config(format!("DEFAULT_RANGE_DAYS '{days}' is not an integer"))
            })?;
        }
        if let Some(currency) = lookup("CURRENCY") {
            config.currency = currency;
        }
        if let Some(dir) = lookup("REPORT_DIR") {
            config.report_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("RENDERER_URL") {
            let url = url.trim().to_string();
            config.renderer_url = (!url.is_empty()).then_some(url);
        }
        if let Some(filter) = lookup("LOG") {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Normalize and check values. Currency codes are uppercased.
    pub fn validate(&mut self) -> Result<(), CoreError> {
        if !(1..=MAX_RANGE_DAYS).contains(&self.default_range_days) {
            return Err(CoreError::Config(format!(
                "default_range_days must be between 1 and {MAX_RANGE_DAYS} (got {})",
                self.default_range_days
            )));
        }

        let currency = self.currency.trim().to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::Config(format!(
                "Invalid currency code '{}': must be exactly 3 ASCII letters (e.g., USD, EUR, PLN)",
                self.currency
            )));
        }
        self.currency = currency;

        if let Some(url) = &self.renderer_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CoreError::Config(format!(
                    "renderer_url '{url}' must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }
}
