//! # Live Prediction
//!
//! Turns the simulator's view of a race in progress into a provisional championship table.
//!
//! - [`LiveSnapshot`]: car slots filled from session info and per-car telemetry
//! - [`Predictor`]: cached finalized baseline plus per-refresh recomputation
//! - [`PredictedStandings`]: merged current/predicted view per class
//!
//! ```rust
//! use pitwall_standings::{ChampionshipConfig, LiveSnapshot, Predictor};
//!
//! let predictor = Predictor::new(ChampionshipConfig::default(), Vec::new());
//! let predicted = predictor.predict(&LiveSnapshot::new());
//! assert!(predicted.standings.is_empty());
//! ```

mod predictor;
mod snapshot;
mod view;

pub use predictor::Predictor;
pub use snapshot::{
    CLASS_POSITION_VAR, CarSlot, ConnectionStatus, IR_MAX_CARS, LAP_VAR, LiveSnapshot,
};
pub use view::{ClassStanding, PredictedRow, PredictedStandings};
