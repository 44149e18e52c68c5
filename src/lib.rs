//! Championship scoring and live standings prediction for multi-split iRacing series.
//!
//! Pitwall Standings turns a season of race results into a deterministic championship table
//! and keeps a provisional table up to date while a race is still running.
//!
//! # Features
//!
//! - **Split-aware scoring**: per-split points schedules, 75% classification, unscored splits
//! - **Drop rule**: best-of-N results with a total tie-break cascade
//! - **Live prediction**: splice the race in progress into the season and diff the tables
//! - **Async refresh**: optional tokio loop publishing predictions to subscribers
//!
//! # Quick Start
//!
//! ```rust
//! use pitwall_standings::{ChampionshipConfig, Season, parse_results};
//! use pitwall_standings::types::CarClassId;
//!
//! let results = parse_results(r#"[{
//!     "session_id": 1, "subsession_id": 11,
//!     "start_time": "2024-03-05T19:00:00Z",
//!     "session_splits": [{ "subsession_id": 11 }],
//!     "session_results": [{ "simsession_name": "RACE", "results": [
//!         { "cust_id": 1, "display_name": "A. Driver", "finish_position_in_class": 0,
//!           "laps_complete": 20, "car_id": 77, "car_class_id": 84 },
//!         { "cust_id": 2, "display_name": "B. Driver", "finish_position_in_class": 1,
//!           "laps_complete": 20, "car_id": 77, "car_class_id": 84 }
//!     ]}]
//! }]"#)?;
//!
//! let mut season = Season::new(&ChampionshipConfig::default());
//! season.load_race_data(&results);
//!
//! let table = season.standings(CarClassId(84));
//! assert_eq!(table.table[0].dropped_round_points, 25);
//! assert_eq!(table.table[1].dropped_round_points, 22);
//! # Ok::<(), pitwall_standings::StandingsError>(())
//! ```
//!
//! For live prediction see [`Predictor`], and [`LiveFeed`] for the refresh loop.

// Core types and error handling
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Inputs
pub mod config;
pub mod schema;

// Engine
pub mod registry;
pub mod scoring;
pub mod season;
pub mod standings;

// Live prediction and the refresh loop
pub mod driver;
pub mod feed;
pub mod live;
pub mod source;
pub mod stream;

// Core exports
pub use error::*;

pub use config::ChampionshipConfig;
pub use feed::LiveFeed;
pub use live::{
    CarSlot, ClassStanding, ConnectionStatus, LiveSnapshot, PredictedRow, PredictedStandings,
    Predictor,
};
pub use registry::CarClassRegistry;
pub use schema::{RaceResult, SessionInfo, load_results, parse_results};
pub use scoring::{PointsSchedule, Position};
pub use season::Season;
pub use source::{SnapshotSequence, SnapshotSource};
pub use standings::{ChampionshipTableRow, Standings};
