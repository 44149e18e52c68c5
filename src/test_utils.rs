//! Test utilities for building result records and live snapshots
//!
//! Shared by unit tests, the integration tests and the benchmarks so fixtures read the same
//! everywhere.

#![cfg(any(test, feature = "benchmark"))]

use crate::live::{CarSlot, LiveSnapshot};
use crate::schema::results::RACE_SESSION_NAME;
use crate::schema::{
    CarInClass, RaceResult, ResultCarClass, ResultEntry, ResultTrack, SessionResults, SessionSplit,
};
use crate::types::{CarClassId, CarId, CustId, SeriesId, SessionId, SubsessionId, TrackId};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Prototype class used by most fixtures.
pub const GTP: CarClassId = CarClassId(84);
/// Second class for multiclass fixtures.
pub const GTO: CarClassId = CarClassId(83);

pub const GTP_CAR: CarId = CarId(77);
pub const GTO_CAR: CarId = CarId(76);

/// Track ID used unless a builder overrides it.
pub const DEFAULT_TRACK: TrackId = TrackId(341);

/// Midnight on the first race day; builders offset from here.
pub fn season_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single().unwrap_or_default()
}

/// A classified GTP finisher with a generated name and 1000 iRating.
pub fn finisher(cust_id: i64, finish_position_in_class: u32, laps_complete: u32) -> ResultEntry {
    ResultEntry {
        cust_id: CustId(cust_id),
        display_name: format!("Driver {cust_id}"),
        finish_position_in_class,
        laps_complete,
        car_id: GTP_CAR,
        car_class_id: GTP,
        car_name: "Nissan GTP ZX-T".to_string(),
        new_i_rating: 1000,
    }
}

/// Chained tweaks on a [`finisher`].
pub trait FinisherExt {
    fn named(self, name: &str) -> Self;
    fn car(self, car_id: i32, car_name: &str) -> Self;
    fn rated(self, i_rating: i32) -> Self;
    fn class(self, car_class_id: CarClassId) -> Self;
}

impl FinisherExt for ResultEntry {
    fn named(mut self, name: &str) -> Self {
        self.display_name = name.to_string();
        self
    }

    fn car(mut self, car_id: i32, car_name: &str) -> Self {
        self.car_id = CarId(car_id);
        self.car_name = car_name.to_string();
        self
    }

    fn rated(mut self, i_rating: i32) -> Self {
        self.new_i_rating = i_rating;
        self
    }

    fn class(mut self, car_class_id: CarClassId) -> Self {
        self.car_class_id = car_class_id;
        if car_class_id == GTO {
            self.car_id = GTO_CAR;
            self.car_name = "Audi 90 GTO".to_string();
        }
        self
    }
}

/// Builder for one subsession's [`RaceResult`].
#[derive(Debug, Clone)]
pub struct ResultBuilder {
    session_id: i64,
    subsession_id: i64,
    siblings: Vec<i64>,
    track_id: i32,
    hour: u32,
    with_race: bool,
    results: Vec<ResultEntry>,
}

impl ResultBuilder {
    /// A single-split record at the default track, starting at [`season_start`].
    pub fn new(session_id: i64, subsession_id: i64) -> Self {
        Self {
            session_id,
            subsession_id,
            siblings: vec![subsession_id],
            track_id: DEFAULT_TRACK.0,
            hour: 0,
            with_race: true,
            results: Vec::new(),
        }
    }

    /// Declared sibling subsessions, top split first.
    pub fn siblings(mut self, subsession_ids: &[i64]) -> Self {
        self.siblings = subsession_ids.to_vec();
        self
    }

    pub fn track(mut self, track_id: i32) -> Self {
        self.track_id = track_id;
        self
    }

    /// Drop the RACE block, leaving a record with no race results.
    pub fn without_race(mut self) -> Self {
        self.with_race = false;
        self
    }

    pub fn starts_at_hour(mut self, hour: u32) -> Self {
        self.hour = hour;
        self
    }

    pub fn finisher(mut self, entry: ResultEntry) -> Self {
        self.results.push(entry);
        self
    }

    pub fn build(self) -> RaceResult {
        let results = if self.with_race {
            vec![SessionResults { simsession_name: RACE_SESSION_NAME.to_string(), results: self.results }]
        } else {
            vec![SessionResults { simsession_name: "QUALIFY".to_string(), results: self.results }]
        };

        RaceResult {
            session_id: SessionId(self.session_id),
            subsession_id: SubsessionId(self.subsession_id),
            series_id: SeriesId(285),
            start_time: season_start() + Duration::hours(i64::from(self.hour)),
            track: ResultTrack {
                track_id: TrackId(self.track_id),
                track_name: "Road America".to_string(),
                config_name: Some("Full Course".to_string()),
            },
            car_classes: vec![
                ResultCarClass {
                    car_class_id: GTP,
                    short_name: "GTP".to_string(),
                    name: "Nissan GTP ZX-T".to_string(),
                    cars_in_class: vec![CarInClass { car_id: GTP_CAR }],
                },
                ResultCarClass {
                    car_class_id: GTO,
                    short_name: "GTO".to_string(),
                    name: "Audi 90 GTO".to_string(),
                    cars_in_class: vec![CarInClass { car_id: GTO_CAR }],
                },
            ],
            session_splits: self
                .siblings
                .into_iter()
                .map(|id| SessionSplit { subsession_id: SubsessionId(id) })
                .collect(),
            session_results: results,
        }
    }
}

/// Builder for a connected [`LiveSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: LiveSnapshot,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    /// A connected race session at the default track, subsession 9001 of session 7001.
    pub fn new() -> Self {
        let mut snapshot = LiveSnapshot::new();
        snapshot.status = crate::live::ConnectionStatus::Connected;
        snapshot.series_id = SeriesId(285);
        snapshot.session_id = SessionId(7001);
        snapshot.subsession_id = SubsessionId(9001);
        snapshot.session_type = "Race".to_string();
        snapshot.track_id = DEFAULT_TRACK;
        snapshot.track_name = "Road America - Full Course".to_string();
        Self { snapshot }
    }

    pub fn pace_car() -> CarSlot {
        CarSlot {
            driver_name: "Pace Car".to_string(),
            car_name: "Safety Car".to_string(),
            is_pace_car: true,
            ..Default::default()
        }
    }

    /// A racing car of `car_class_id`, named after its customer ID.
    pub fn racer(cust_id: i64, car_class_id: CarClassId, i_rating: i32) -> CarSlot {
        let (car_id, car_name, class_name) = if car_class_id == GTO {
            (GTO_CAR, "Audi 90 GTO", "GTO")
        } else {
            (GTP_CAR, "Nissan GTP ZX-T", "GTP")
        };
        CarSlot {
            cust_id: CustId(cust_id),
            driver_name: format!("Driver {cust_id}"),
            car_class_id,
            car_class_name: class_name.to_string(),
            car_id,
            car_name: car_name.to_string(),
            car_number: cust_id.to_string(),
            i_rating,
            ..Default::default()
        }
    }

    pub fn session(mut self, session_id: i64, subsession_id: i64) -> Self {
        self.snapshot.session_id = SessionId(session_id);
        self.snapshot.subsession_id = SubsessionId(subsession_id);
        self
    }

    /// Place `slot` at `car_idx`; out-of-range indices are ignored.
    pub fn car(mut self, car_idx: usize, slot: CarSlot) -> Self {
        if let Some(target) = self.snapshot.car_mut(car_idx) {
            *target = slot;
        }
        self
    }

    /// Set live progress for the car at `car_idx`.
    pub fn running(mut self, car_idx: usize, race_position_in_class: u32, laps_complete: u32) -> Self {
        if let Some(target) = self.snapshot.car_mut(car_idx) {
            target.race_position_in_class = race_position_in_class;
            target.laps_complete = laps_complete;
        }
        self
    }

    pub fn build(mut self) -> LiveSnapshot {
        if self.snapshot.self_car_class_id.is_none() {
            self.snapshot.self_car_class_id = self.snapshot.racing_classes().into_iter().next();
        }
        self.snapshot
    }
}
