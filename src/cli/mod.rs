//! Control plane (spec §6): CLI flags plus the `ARB_EVAL_INTERVAL_MS`
//! environment override (read directly by `Config::eval_interval_ms`).

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "paper-arb", about = "Paper-trading arbitrage engine for binary prediction markets")]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    pub config: std::path::PathBuf,

    /// Comma-separated profile names to run; defaults to every profile in the config.
    #[arg(long, value_delimiter = ',')]
    pub profiles: Option<Vec<String>>,

    /// Comma-separated coin symbols to run; defaults to every coin in each profile.
    #[arg(long, value_delimiter = ',')]
    pub coins: Option<Vec<String>>,

    /// Run unattended against the fixture supplier instead of real venue clients.
    #[arg(long)]
    pub auto: bool,

    /// Suppress the terminal dashboard (out of scope for this core; accepted for CLI compatibility).
    #[arg(long)]
    pub headless: bool,

    /// Override the configured log level.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Restrict a profile's coin list to those named on the command line, if any were given.
    #[must_use]
    pub fn filter_coins(&self, coins: &str) -> bool {
        self.coins
            .as_ref()
            .map(|wanted| wanted.iter().any(|c| c.eq_ignore_ascii_case(coins)))
            .unwrap_or(true)
    }

    /// Restrict the set of profiles to those named on the command line, if any were given.
    #[must_use]
    pub fn filter_profile(&self, name: &str) -> bool {
        self.profiles
            .as_ref()
            .map(|wanted| wanted.iter().any(|p| p.eq_ignore_ascii_case(name)))
            .unwrap_or(true)
    }
}
