//! Historical race results
//!
//! One [`RaceResult`] per subsession, in the shape the iRacing results service returns. Only the
//! fields the championship consumes are modelled; everything else in the payload is ignored.
//! Every field is defaulted so partially-populated records (and synthetic live records) still
//! deserialize.

use crate::types::{CarClassId, CarId, CustId, SeriesId, SessionId, SubsessionId, TrackId};
use crate::{Result, StandingsError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the session block that carries race finishing positions.
pub const RACE_SESSION_NAME: &str = "RACE";

/// One subsession's results record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceResult {
    pub session_id: SessionId,
    pub subsession_id: SubsessionId,
    pub series_id: SeriesId,
    pub start_time: DateTime<Utc>,
    pub track: ResultTrack,
    pub car_classes: Vec<ResultCarClass>,
    /// Every split of the same session, top split first.
    pub session_splits: Vec<SessionSplit>,
    pub session_results: Vec<SessionResults>,
}

impl RaceResult {
    /// The block whose `simsession_name` is `RACE`, if any.
    pub fn race_session(&self) -> Option<&SessionResults> {
        self.session_results.iter().find(|session| session.simsession_name == RACE_SESSION_NAME)
    }

    /// Index of this subsession within its sibling list.
    pub fn split_index(&self) -> Option<usize> {
        self.session_splits.iter().position(|split| split.subsession_id == self.subsession_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultTrack {
    pub track_id: TrackId,
    pub track_name: String,
    pub config_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultCarClass {
    pub car_class_id: CarClassId,
    pub short_name: String,
    pub name: String,
    pub cars_in_class: Vec<CarInClass>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarInClass {
    pub car_id: CarId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSplit {
    pub subsession_id: SubsessionId,
}

/// Results of one simulated session (practice, qualify, race) within a subsession.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionResults {
    pub simsession_name: String,
    pub results: Vec<ResultEntry>,
}

/// One driver's line in a session's results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultEntry {
    pub cust_id: CustId,
    pub display_name: String,
    /// Zero-based.
    pub finish_position_in_class: u32,
    pub laps_complete: u32,
    pub car_id: CarId,
    pub car_class_id: CarClassId,
    pub car_name: String,
    #[serde(rename = "newi_rating")]
    pub new_i_rating: i32,
}

/// Parse a season's worth of result records.
///
/// A malformed payload is fatal: there is no baseline to degrade to.
pub fn parse_results(json: &str) -> Result<Vec<RaceResult>> {
    let results: Vec<RaceResult> = serde_json::from_str(json)?;
    debug!(records = results.len(), "Parsed historical results");
    Ok(results)
}

/// Read and parse a results file.
pub fn load_results(path: impl AsRef<std::path::Path>) -> Result<Vec<RaceResult>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| StandingsError::file_error(path.to_path_buf(), e))?;
    parse_results(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"[{
        "session_id": 7001,
        "subsession_id": 9002,
        "series_id": 285,
        "start_time": "2024-03-12T18:00:00Z",
        "track": {"track_id": 341, "track_name": "Road America"},
        "car_classes": [{"car_class_id": 84, "short_name": "GTP", "name": "Nissan GTP ZX-T",
                         "cars_in_class": [{"car_id": 77}]}],
        "session_splits": [{"subsession_id": 9001}, {"subsession_id": 9002}],
        "session_results": [
            {"simsession_name": "QUALIFY", "results": []},
            {"simsession_name": "RACE", "results": [
                {"cust_id": 1, "display_name": "A Driver", "finish_position_in_class": 0,
                 "laps_complete": 20, "car_id": 77, "car_class_id": 84,
                 "car_name": "Nissan GTP ZX-T", "newi_rating": 2400, "unused_field": true}
            ]}
        ]
    }]"#;

    #[test]
    fn parses_record_and_ignores_unknown_fields() {
        let results = parse_results(RECORD).unwrap();
        assert_eq!(results.len(), 1);

        let record = &results[0];
        assert_eq!(record.session_id, SessionId(7001));
        assert_eq!(record.split_index(), Some(1));
        assert_eq!(record.track.track_name, "Road America");

        let race = record.race_session().expect("race block");
        assert_eq!(race.results[0].cust_id, CustId(1));
        assert_eq!(race.results[0].new_i_rating, 2400);
    }

    #[test]
    fn split_index_is_none_when_not_a_sibling() {
        let record = RaceResult {
            subsession_id: SubsessionId(5),
            session_splits: vec![SessionSplit { subsession_id: SubsessionId(6) }],
            ..Default::default()
        };
        assert_eq!(record.split_index(), None);
        assert!(record.race_session().is_none());
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let err = parse_results("<html>503</html>").unwrap_err();
        assert!(matches!(err, StandingsError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let err = load_results("/nonexistent/season.json").unwrap_err();
        assert!(matches!(err, StandingsError::File { .. }));
    }
}
