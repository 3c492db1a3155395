use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use paper_arb::config::Config;
use paper_arb::core::engine::ArbitrageEngine;
use paper_arb::core::exchange::FixtureSupplier;
use paper_arb::core::multiplexer::{ProfileMultiplexer, SystemClock};
use paper_arb::core::service::Logger;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config).with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    config.init_logging();

    let run_dir = paper_arb::core::service::logger::next_run_dir("runs").context("creating run directory")?;
    info!(run_dir = %run_dir.display(), "paper-arb starting");

    let selected_profiles: Vec<_> = config
        .profiles
        .iter()
        .filter(|p| cli.filter_profile(&p.name))
        .cloned()
        .collect();

    if selected_profiles.is_empty() {
        bail!("no profiles matched --profiles filter");
    }

    let profile_names: Vec<String> = selected_profiles.iter().map(|p| p.name.clone()).collect();
    let run_loggers = paper_arb::core::service::logger::RunLoggers::create(&run_dir, &profile_names)
        .context("initializing run loggers")?;

    if !cli.auto {
        warn!("only the fixture supplier is wired into this binary; real venue clients are out of scope for the core (--auto assumed)");
    }

    let started_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);

    let mismatch = Arc::new(run_loggers.mismatch);
    let engines: Vec<ArbitrageEngine> = selected_profiles
        .iter()
        .zip(run_loggers.profiles)
        .map(|(profile, logger)| {
            let mut profile = profile.clone();
            profile.coins.retain(|c| cli.filter_coins(&c.coin));
            ArbitrageEngine::with_mismatch_sink(&profile, started_ms, logger, Some(mismatch.clone()))
        })
        .collect();

    let supplier_p: Arc<dyn paper_arb::core::exchange::SnapshotSupplier> =
        Arc::new(FixtureSupplier::fixed(std::collections::HashMap::new()));
    let supplier_k: Arc<dyn paper_arb::core::exchange::SnapshotSupplier> =
        Arc::new(FixtureSupplier::fixed(std::collections::HashMap::new()));

    let multiplexer = ProfileMultiplexer::new(
        engines,
        supplier_p,
        supplier_k,
        config.eval_interval_ms(),
        config.runtime.render_interval_ms,
        Arc::new(SystemClock),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut handle = tokio::spawn(multiplexer.run(shutdown_rx));

    tokio::select! {
        result = &mut handle => {
            if let Ok(engines) = result {
                log_final_summaries(&run_loggers.system, &engines);
            }
        }
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
            if let Ok(engines) = handle.await {
                log_final_summaries(&run_loggers.system, &engines);
            }
        }
    }

    info!("paper-arb stopped");
    Ok(())
}

fn log_final_summaries(system: &Logger, engines: &[ArbitrageEngine]) {
    for engine in engines {
        let summary = engine.summary();
        system.log(
            paper_arb::core::service::LogLevel::Info,
            &format!(
                "profile {} final: trades={} wins={} losses={} profit={}",
                engine.name(),
                summary.total_trades,
                summary.wins,
                summary.losses,
                summary.total_profit
            ),
        );
    }
}
