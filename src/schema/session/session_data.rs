//! Session list from the session info

use serde::{Deserialize, Serialize};

/// `SessionInfo` block: the sessions of the event (practice, qualify, race).
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SessionInfoData {
    pub current_session_num: i32,
    pub sessions: Vec<Session>,
}

impl SessionInfoData {
    /// The session at `current_session_num`, if listed.
    pub fn current(&self) -> Option<&Session> {
        self.sessions.iter().find(|session| session.session_num == self.current_session_num)
    }
}

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Session {
    pub session_num: i32,
    /// Session type, e.g. "Practice", "Lone Qualify", "Race"
    pub session_type: String,
    /// Session name, e.g. "PRACTICE", "QUALIFY", "RACE"
    pub session_name: Option<String>,
}
