//! Weekend and track information

use serde::{Deserialize, Serialize};

/// `WeekendInfo` block: series, session identifiers and the track.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct WeekendInfo {
    /// Internal track name
    pub track_name: String,
    #[serde(rename = "TrackID")]
    pub track_id: Option<i32>,
    /// Track display name
    pub track_display_name: String,
    /// Track configuration name, blank for single-layout tracks
    pub track_config_name: Option<String>,
    #[serde(rename = "SeriesID")]
    pub series_id: Option<i32>,
    #[serde(rename = "SessionID")]
    pub session_id: Option<i64>,
    #[serde(rename = "SubSessionID")]
    pub sub_session_id: Option<i64>,
    pub event_type: Option<String>,
}

impl WeekendInfo {
    /// Display name with the layout appended, e.g. "Road America - Full Course".
    pub fn full_track_name(&self) -> String {
        match self.track_config_name.as_deref().map(str::trim) {
            Some(config) if !config.is_empty() => {
                format!("{} - {}", self.track_display_name, config)
            }
            _ => self.track_display_name.clone(),
        }
    }
}
