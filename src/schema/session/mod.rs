//! # Session Information Parsing
//!
//! The simulator publishes a YAML document describing the current event: weekend and track
//! details, the session list, and one entry per car slot. Live standings need only a small
//! part of it, so only that part is modelled here. Unknown keys are ignored.
//!
//! ## YAML Compatibility
//!
//! The simulator's YAML is not valid as written: user-typed names are unquoted and control
//! characters leak through. [`SessionInfo::parse`] runs [`preprocess_session_yaml`] first:
//!
//! ```text
//! UserName: O'Connor, Mike      ->  UserName: 'O''Connor, Mike'
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

mod driver;
mod preprocess;
mod session_data;
mod weekend;

pub use driver::{Driver, DriverInfoData};
pub use preprocess::preprocess_session_yaml;
pub use session_data::{Session, SessionInfoData};
pub use weekend::WeekendInfo;

/// Session information parsed from the simulator's session YAML.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SessionInfo {
    pub weekend_info: WeekendInfo,
    pub session_info: SessionInfoData,
    pub driver_info: DriverInfoData,
}

impl SessionInfo {
    /// Preprocess and deserialize raw session YAML.
    pub fn parse(yaml: &str) -> crate::Result<Self> {
        let cleaned = preprocess_session_yaml(yaml)?;
        let info: SessionInfo = serde_yaml_ng::from_str(&cleaned).map_err(|e| {
            crate::StandingsError::parse_error("SessionInfo deserialization", e.to_string())
        })?;

        debug!(
            track = %info.weekend_info.track_display_name,
            drivers = info.driver_info.drivers.len(),
            sessions = info.session_info.sessions.len(),
            "Parsed session info"
        );
        Ok(info)
    }

    /// Session type of the current session ("Race", "Practice", ...), blank if unknown.
    pub fn current_session_type(&self) -> &str {
        self.session_info.current().map(|s| s.session_type.as_str()).unwrap_or_default()
    }
}
