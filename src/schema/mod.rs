//! Input records consumed by the engine
//!
//! - [`results`]: historical per-subsession race results (JSON from the results service)
//! - [`session`]: the simulator's live session-info YAML
//!
//! Both are ingestion boundaries and the only places the engine returns parse errors.

pub mod results;
pub mod session;

pub use results::{
    CarInClass, RaceResult, ResultCarClass, ResultEntry, ResultTrack, SessionResults,
    SessionSplit, load_results, parse_results,
};
pub use session::SessionInfo;
