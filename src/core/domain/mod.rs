//! Core domain types (C1): snapshots, estimates, positions, and the
//! per-coin runtime state the state machine mutates.

pub mod direction;
pub mod estimate;
pub mod ids;
pub mod market_view;
pub mod outcome;
pub mod pending;
pub mod position;
pub mod runtime;
pub mod snapshot;
pub mod summary;

pub use direction::Direction;
pub use estimate::{FillEstimate, FillSource, WalkResult};
pub use ids::{CoinId, MarketKey, TokenId};
pub use market_view::MarketView;
pub use outcome::{OutcomeSource, ResolvedOutcome, VenueOutcome};
pub use pending::PendingOrder;
pub use position::{LockedThresholds, OpenPosition};
pub use runtime::{CoinRuntimeState, CoinState};
pub use snapshot::{DataStatus, OrderBook, PriceLevel, ReferenceSource, Snapshot, TradeTick, Venue};
pub use summary::{EngineSummary, PnlPoint};
