use thiserror::Error;

use crate::core::domain::CoinId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("supplier failed to start for venue {venue}: {source}")]
    SupplierStart { venue: String, source: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Per-tick evaluation error: one coin's step failed. Caught and logged by
/// `ArbitrageEngine::evaluate`; never propagated past the engine (spec §7).
#[derive(Error, Debug, Clone)]
#[error("coin {coin} evaluation failed: {message}")]
pub struct CoinError {
    pub coin: CoinId,
    pub message: String,
}

impl CoinError {
    #[must_use]
    pub fn new(coin: CoinId, message: impl Into<String>) -> Self {
        Self {
            coin,
            message: message.into(),
        }
    }
}
