//! # Season Aggregation
//!
//! Ingests a season of historical result records into [`Event`]s keyed by session, each holding
//! its parallel [`Split`]s keyed by split number, and exposes scored positions per class.
//!
//! ## Rebuild semantics
//!
//! [`Season::load_race_data`] rebuilds every event from scratch on each call. The car registry
//! and the driver table only grow, so names learned from an earlier load survive a later one.
//!
//! ## Partial data
//!
//! Live data is incomplete by nature, so records that cannot be placed are skipped, not
//! rejected:
//!
//! - records at an excluded track
//! - records without a `RACE` session
//! - records whose subsession is missing from their own sibling split list
//!
//! ## Split identity
//!
//! A record's split number is its index in the declared `session_splits` list, never its
//! arrival order, so a split keeps the same number across refreshes.

use crate::config::ChampionshipConfig;
use crate::registry::CarClassRegistry;
use crate::schema::RaceResult;
use crate::scoring::{self, PointsSchedule, Position};
use crate::standings::{self, Standings};
use crate::types::{CarClassId, CustId, SessionId, SplitNum, TrackId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

mod event;

pub use event::{Entrant, Event, Split};

/// A driver as first seen in the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    pub cust_id: CustId,
    pub display_name: String,
    /// Rating at first appearance; only used as a last-resort tie-break.
    pub i_rating: i32,
}

/// All ingested events of a season plus the names learned along the way.
#[derive(Debug, Clone)]
pub struct Season {
    schedule: PointsSchedule,
    count_best_of: usize,
    excluded_track_ids: BTreeSet<TrackId>,
    registry: CarClassRegistry,
    drivers: BTreeMap<CustId, Driver>,
    events: BTreeMap<SessionId, Event>,
}

impl Season {
    pub fn new(config: &ChampionshipConfig) -> Self {
        Self {
            schedule: config.points_per_split.clone(),
            count_best_of: config.count_best_of,
            excluded_track_ids: config.excluded_track_ids.iter().copied().collect(),
            registry: CarClassRegistry::new(),
            drivers: BTreeMap::new(),
            events: BTreeMap::new(),
        }
    }

    /// Rebuild all events from `results`.
    pub fn load_race_data(&mut self, results: &[RaceResult]) {
        self.events.clear();

        for record in results {
            if self.excluded_track_ids.contains(&record.track.track_id) {
                debug!(subsession_id = %record.subsession_id, track_id = %record.track.track_id, "Skipping excluded track");
                continue;
            }

            self.registry.register_classes(&record.car_classes);

            let Some(race) = record.race_session() else {
                debug!(subsession_id = %record.subsession_id, "Skipping record without a RACE session");
                continue;
            };
            let Some(index) = record.split_index() else {
                debug!(subsession_id = %record.subsession_id, "Skipping record with unknown split");
                continue;
            };
            let Ok(split_num) = u32::try_from(index).map(SplitNum) else {
                continue;
            };

            let event = self.events.entry(record.session_id).or_insert_with(|| {
                Event::new(record.session_id, record.start_time, record.track.track_name.clone())
            });
            let split = event.split_mut(split_num, record.subsession_id);
            if split.subsession_id != record.subsession_id {
                debug!(
                    subsession_id = %record.subsession_id,
                    existing = %split.subsession_id,
                    split = %split_num,
                    "Skipping record for a split already loaded from another subsession"
                );
                continue;
            }

            for entry in &race.results {
                split.add_entrant(
                    entry.car_class_id,
                    Entrant {
                        cust_id: entry.cust_id,
                        finish_position_in_class: entry.finish_position_in_class,
                        laps_complete: entry.laps_complete,
                        car_id: entry.car_id,
                    },
                );

                self.drivers
                    .entry(entry.cust_id)
                    .and_modify(|driver| {
                        if !entry.display_name.is_empty() {
                            driver.display_name.clone_from(&entry.display_name);
                        }
                    })
                    .or_insert_with(|| Driver {
                        cust_id: entry.cust_id,
                        display_name: entry.display_name.clone(),
                        i_rating: entry.new_i_rating,
                    });

                self.registry.set_car_name(entry.car_id, &entry.car_name);
            }
        }

        debug!(
            records = results.len(),
            events = self.events.len(),
            drivers = self.drivers.len(),
            "Loaded race data"
        );
    }

    /// Events ordered by start time, then session ID.
    pub fn events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort_by_key(|event| (event.start_time, event.session_id));
        events
    }

    pub fn event(&self, session_id: SessionId) -> Option<&Event> {
        self.events.get(&session_id)
    }

    /// Every scored position of a class, in chronological then split order.
    pub fn positions(&self, car_class_id: CarClassId) -> Vec<Position> {
        self.events()
            .into_iter()
            .flat_map(Event::splits)
            .flat_map(|split| scoring::score(split, car_class_id, &self.schedule))
            .collect()
    }

    /// Championship table for a class using the configured drop rule.
    pub fn standings(&self, car_class_id: CarClassId) -> Standings {
        self.standings_best_of(car_class_id, self.count_best_of)
    }

    pub fn standings_best_of(&self, car_class_id: CarClassId, count_best_of: usize) -> Standings {
        standings::build(self, car_class_id, count_best_of)
    }

    /// Classes with at least one entrant in any split.
    pub fn class_ids(&self) -> BTreeSet<CarClassId> {
        self.events.values().flat_map(Event::splits).flat_map(Split::class_ids).collect()
    }

    pub fn driver(&self, cust_id: CustId) -> Option<&Driver> {
        self.drivers.get(&cust_id)
    }

    pub fn registry(&self) -> &CarClassRegistry {
        &self.registry
    }

    pub fn count_best_of(&self) -> usize {
        self.count_best_of
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FinisherExt, ResultBuilder, finisher};
    use crate::types::{CarId, SubsessionId};

    fn config() -> ChampionshipConfig {
        ChampionshipConfig { excluded_track_ids: vec![TrackId(18)], ..Default::default() }
    }

    #[test]
    fn splits_are_numbered_by_declared_sibling_order() {
        // Split 1 arrives first; its number still comes from the sibling list
        let results = vec![
            ResultBuilder::new(7001, 9002)
                .siblings(&[9001, 9002])
                .finisher(finisher(2, 0, 20))
                .build(),
            ResultBuilder::new(7001, 9001)
                .siblings(&[9001, 9002])
                .finisher(finisher(1, 0, 20))
                .build(),
        ];

        let mut season = Season::new(&config());
        season.load_race_data(&results);

        let events = season.events();
        assert_eq!(events.len(), 1);
        let splits: Vec<(SplitNum, SubsessionId)> =
            events[0].splits().map(|s| (s.split_num, s.subsession_id)).collect();
        assert_eq!(
            splits,
            vec![(SplitNum(0), SubsessionId(9001)), (SplitNum(1), SubsessionId(9002))]
        );
    }

    #[test]
    fn skips_unplaceable_records() {
        let results = vec![
            ResultBuilder::new(1, 11).track(18).finisher(finisher(1, 0, 10)).build(),
            ResultBuilder::new(2, 21).without_race().finisher(finisher(1, 0, 10)).build(),
            ResultBuilder::new(3, 31).siblings(&[30]).finisher(finisher(1, 0, 10)).build(),
            ResultBuilder::new(4, 41).finisher(finisher(1, 0, 10)).build(),
        ];

        let mut season = Season::new(&config());
        season.load_race_data(&results);

        let sessions: Vec<SessionId> = season.events().iter().map(|e| e.session_id).collect();
        assert_eq!(sessions, vec![SessionId(4)]);
    }

    #[test]
    fn events_are_chronological() {
        let results = vec![
            ResultBuilder::new(2, 21).starts_at_hour(12).finisher(finisher(1, 0, 10)).build(),
            ResultBuilder::new(1, 11).starts_at_hour(14).finisher(finisher(1, 0, 10)).build(),
            ResultBuilder::new(3, 31).starts_at_hour(12).finisher(finisher(1, 0, 10)).build(),
        ];

        let mut season = Season::new(&config());
        season.load_race_data(&results);

        let sessions: Vec<i64> = season.events().iter().map(|e| e.session_id.0).collect();
        assert_eq!(sessions, vec![2, 3, 1]);
    }

    #[test]
    fn reload_rebuilds_events_but_keeps_names() {
        let first = vec![
            ResultBuilder::new(1, 11)
                .finisher(finisher(1, 0, 10).named("First Name").car(77, "Nissan GTP ZX-T"))
                .build(),
        ];
        let second = vec![
            ResultBuilder::new(2, 21).finisher(finisher(1, 0, 10).named("Renamed").car(77, "")).build(),
        ];

        let mut season = Season::new(&config());
        season.load_race_data(&first);
        season.load_race_data(&second);

        assert_eq!(season.events().len(), 1);
        assert_eq!(season.driver(CustId(1)).unwrap().display_name, "Renamed");
        assert_eq!(season.registry().car_name(CarId(77)), "Nissan GTP ZX-T");
    }

    #[test]
    fn i_rating_is_fixed_at_first_appearance() {
        let results = vec![
            ResultBuilder::new(1, 11).starts_at_hour(1).finisher(finisher(1, 0, 10).rated(1500)).build(),
            ResultBuilder::new(2, 21).starts_at_hour(2).finisher(finisher(1, 0, 10).rated(1900)).build(),
        ];

        let mut season = Season::new(&config());
        season.load_race_data(&results);
        assert_eq!(season.driver(CustId(1)).unwrap().i_rating, 1500);
    }

    #[test]
    fn positions_follow_event_then_split_order() {
        let results = vec![
            ResultBuilder::new(2, 22)
                .starts_at_hour(2)
                .siblings(&[21, 22])
                .finisher(finisher(1, 0, 10))
                .build(),
            ResultBuilder::new(1, 11).starts_at_hour(1).finisher(finisher(1, 3, 10)).build(),
            ResultBuilder::new(2, 21)
                .starts_at_hour(2)
                .siblings(&[21, 22])
                .finisher(finisher(2, 0, 10))
                .build(),
        ];

        let mut season = Season::new(&config());
        season.load_race_data(&results);

        let order: Vec<(i64, i64)> = season
            .positions(crate::test_utils::GTP)
            .iter()
            .map(|p| (p.subsession_id.0, p.cust_id.0))
            .collect();
        assert_eq!(order, vec![(11, 1), (21, 2), (22, 1)]);
        assert_eq!(season.class_ids().into_iter().collect::<Vec<_>>(), vec![crate::test_utils::GTP]);
    }
}
