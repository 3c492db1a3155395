//! On-disk configuration: runtime cadence plus per-profile × per-coin trade
//! gates. Loaded with `toml` + `dotenvy` overrides, following the teacher's
//! `read_to_string` → `toml::from_str` → `validate()` pattern.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Error, Result};

fn default_eval_interval_ms() -> u64 {
    10
}

fn default_render_interval_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_eval_interval_ms")]
    pub eval_interval_ms: u64,
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            eval_interval_ms: default_eval_interval_ms(),
            render_interval_ms: default_render_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Per-coin trade gate, scoped to a single profile (spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct CoinConfig {
    pub coin: String,
    pub trade_allowed_time_left: i64,
    #[serde(default)]
    pub trade_stop_time_left: Option<i64>,
    pub min_gap: Decimal,
    pub max_spend_total: Decimal,
    #[serde(default)]
    pub min_spend_total: Decimal,
    #[serde(default)]
    pub max_spread: Option<Decimal>,
    #[serde(default)]
    pub min_depth_value: Option<Decimal>,
    #[serde(default)]
    pub max_price_staleness_sec: Option<i64>,
    #[serde(default)]
    pub fill_usd: Option<Decimal>,
    #[serde(default)]
    pub cooldown_ms: i64,
}

impl CoinConfig {
    /// Notional to probe both directions with: the configured `fill_usd`,
    /// clamped to never exceed `max_spend_total` (spec §4.3 step 4).
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.fill_usd.unwrap_or(self.max_spend_total).min(self.max_spend_total)
    }

    fn validate(&self, profile: &str) -> Result<()> {
        let ctx = |field: &str, reason: &str| {
            Error::Config(format!(
                "profile '{profile}' coin '{}': field '{field}' {reason}",
                self.coin
            ))
        };

        if self.trade_allowed_time_left <= 0 {
            return Err(ctx("trade_allowed_time_left", "must be > 0"));
        }
        if let Some(stop) = self.trade_stop_time_left {
            if stop <= 0 || stop >= self.trade_allowed_time_left {
                return Err(ctx(
                    "trade_stop_time_left",
                    "must be in (0, trade_allowed_time_left)",
                ));
            }
        }
        if self.min_gap <= Decimal::ZERO || self.min_gap >= Decimal::ONE {
            return Err(ctx("min_gap", "must be in (0, 1)"));
        }
        if self.max_spend_total <= Decimal::ZERO {
            return Err(ctx("max_spend_total", "must be > 0"));
        }
        if self.min_spend_total < Decimal::ZERO || self.min_spend_total > self.max_spend_total {
            return Err(ctx("min_spend_total", "must be in [0, max_spend_total]"));
        }
        if let Some(fill_usd) = self.fill_usd {
            if fill_usd > self.max_spend_total {
                return Err(ctx("fill_usd", "must be <= max_spend_total"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(default)]
    pub decision_latency_ms: i64,
    pub coins: Vec<CoinConfig>,
}

impl ProfileConfig {
    fn validate(&self) -> Result<()> {
        if self.coins.is_empty() {
            return Err(Error::Config(format!(
                "profile '{}' declares no coins",
                self.name
            )));
        }
        for coin in &self.coins {
            coin.validate(&self.name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub profiles: Vec<ProfileConfig>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            return Err(Error::Config("no profiles configured".into()));
        }
        for profile in &self.profiles {
            profile.validate()?;
        }
        // Eval interval is clamped >= 1ms (spec §4.6); reject anything that
        // would silently round to zero instead of clamping away a typo.
        if self.runtime.eval_interval_ms == 0 {
            return Err(Error::Config("runtime.eval_interval_ms must be >= 1".into()));
        }
        Ok(())
    }

    /// `ARB_EVAL_INTERVAL_MS` overrides `runtime.eval_interval_ms` when set
    /// (spec §6 control plane), clamped to a minimum of 1ms.
    #[must_use]
    pub fn eval_interval_ms(&self) -> u64 {
        std::env::var("ARB_EVAL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(self.runtime.eval_interval_ms)
            .max(1)
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.logging.level));
        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_coin() -> CoinConfig {
        CoinConfig {
            coin: "BTC".into(),
            trade_allowed_time_left: 750,
            trade_stop_time_left: Some(5),
            min_gap: dec!(0.04),
            max_spend_total: dec!(500),
            min_spend_total: Decimal::ZERO,
            max_spread: None,
            min_depth_value: None,
            max_price_staleness_sec: None,
            fill_usd: Some(dec!(500)),
            cooldown_ms: 0,
        }
    }

    #[test]
    fn valid_coin_config_passes() {
        assert!(valid_coin().validate("default").is_ok());
    }

    #[test]
    fn rejects_non_positive_trade_allowed_time_left() {
        let mut coin = valid_coin();
        coin.trade_allowed_time_left = 0;
        assert!(coin.validate("default").is_err());
    }

    #[test]
    fn rejects_stop_time_left_outside_window() {
        let mut coin = valid_coin();
        coin.trade_stop_time_left = Some(750);
        assert!(coin.validate("default").is_err());
    }

    #[test]
    fn rejects_min_gap_out_of_range() {
        let mut coin = valid_coin();
        coin.min_gap = dec!(1.5);
        assert!(coin.validate("default").is_err());
    }

    #[test]
    fn rejects_fill_usd_above_max_spend() {
        let mut coin = valid_coin();
        coin.fill_usd = Some(dec!(600));
        assert!(coin.validate("default").is_err());
    }

    #[test]
    fn notional_is_clamped_to_max_spend_total() {
        let mut coin = valid_coin();
        coin.fill_usd = None;
        coin.max_spend_total = dec!(250);
        assert_eq!(coin.notional(), dec!(250));
    }
}
