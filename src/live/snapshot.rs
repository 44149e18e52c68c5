//! Live session snapshot
//!
//! A fixed array of car slots indexed by the simulator's car index, filled from two sources
//! updated at different rates:
//!
//! - session info (rarely): who is in each slot, their car, class, number and rating
//! - telemetry (every refresh): laps and class positions per slot
//!
//! A slot is *racing* unless it is the pace car, a spectator, or unnamed.

use crate::schema::{
    CarInClass, RaceResult, ResultCarClass, ResultEntry, ResultTrack, SessionInfo, SessionResults,
    SessionSplit, results::RACE_SESSION_NAME,
};
use crate::types::{
    CarClassId, CarId, CustId, SeriesId, SessionId, SubsessionId, TelemetryVars, TrackId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::trace;

/// Number of car slots the simulator publishes (irsdk_MaxCars).
pub const IR_MAX_CARS: usize = 64;

/// Per-car class position, 1-based, 0 while unplaced.
pub const CLASS_POSITION_VAR: &str = "CarIdxClassPosition";
/// Per-car lap counter.
pub const LAP_VAR: &str = "CarIdxLap";

/// Connection state reported alongside predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => f.write_str("Disconnected"),
            ConnectionStatus::Connected => f.write_str("Connected"),
        }
    }
}

/// One car slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSlot {
    pub cust_id: CustId,
    pub driver_name: String,
    pub car_class_id: CarClassId,
    pub car_class_name: String,
    pub car_id: CarId,
    pub car_name: String,
    pub car_number: String,
    pub i_rating: i32,
    pub laps_complete: u32,
    /// Zero-based live position within the class.
    pub race_position_in_class: u32,
    pub is_pace_car: bool,
    pub is_spectator: bool,
    pub is_self: bool,
}

impl CarSlot {
    pub fn is_racing(&self) -> bool {
        !(self.is_pace_car || self.is_spectator || self.driver_name.is_empty())
    }
}

/// Everything the predictor needs from the simulator for one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSnapshot {
    pub status: ConnectionStatus,
    pub series_id: SeriesId,
    pub session_id: SessionId,
    pub subsession_id: SubsessionId,
    /// "Race", "Practice", ...
    pub session_type: String,
    pub track_id: TrackId,
    pub track_name: String,
    pub self_car_class_id: Option<CarClassId>,
    cars: Vec<CarSlot>,
}

impl Default for LiveSnapshot {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::default(),
            series_id: SeriesId::default(),
            session_id: SessionId::default(),
            subsession_id: SubsessionId::default(),
            session_type: String::new(),
            track_id: TrackId::default(),
            track_name: String::new(),
            self_car_class_id: None,
            cars: vec![CarSlot::default(); IR_MAX_CARS],
        }
    }
}

impl LiveSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// All slots, indexed by car index.
    pub fn cars(&self) -> &[CarSlot] {
        &self.cars
    }

    /// Slot at `car_idx`; `None` outside `0..IR_MAX_CARS`.
    pub fn car_mut(&mut self, car_idx: usize) -> Option<&mut CarSlot> {
        self.cars.get_mut(car_idx)
    }

    pub fn racing_cars(&self) -> impl Iterator<Item = &CarSlot> {
        self.cars.iter().filter(|car| car.is_racing())
    }

    fn racing_in_class(&self, car_class_id: CarClassId) -> impl Iterator<Item = &CarSlot> {
        self.racing_cars().filter(move |car| car.car_class_id == car_class_id)
    }

    /// Classes with at least one racing car.
    pub fn racing_classes(&self) -> BTreeSet<CarClassId> {
        self.racing_cars().map(|car| car.car_class_id).collect()
    }

    /// Mean iRating of racing cars in a class, truncated; 0 for an empty class.
    pub fn strength_of_field(&self, car_class_id: CarClassId) -> i32 {
        let (total, count) = self
            .racing_in_class(car_class_id)
            .fold((0i64, 0i64), |(total, count), car| (total + i64::from(car.i_rating), count + 1));
        if count == 0 { 0 } else { (total / count) as i32 }
    }

    /// Laps completed by the class leader.
    pub fn leader_laps_complete(&self, car_class_id: CarClassId) -> u32 {
        self.racing_in_class(car_class_id).map(|car| car.laps_complete).max().unwrap_or(0)
    }

    /// Fill slots and session identifiers from parsed session info.
    ///
    /// Slots are rebuilt; a slot keeping the same driver keeps its live laps and position.
    pub fn apply_session_info(&mut self, info: &SessionInfo) {
        let weekend = &info.weekend_info;
        self.status = ConnectionStatus::Connected;
        self.series_id = SeriesId(weekend.series_id.unwrap_or_default());
        self.session_id = SessionId(weekend.session_id.unwrap_or_default());
        self.subsession_id = SubsessionId(weekend.sub_session_id.unwrap_or_default());
        self.track_id = TrackId(weekend.track_id.unwrap_or_default());
        self.track_name = weekend.full_track_name();
        self.session_type = info.current_session_type().to_string();

        let previous = std::mem::replace(&mut self.cars, vec![CarSlot::default(); IR_MAX_CARS]);
        let self_idx = info.driver_info.driver_car_idx;

        for driver in &info.driver_info.drivers {
            let Some(slot) = usize::try_from(driver.car_idx).ok().and_then(|i| self.cars.get_mut(i))
            else {
                continue;
            };

            *slot = CarSlot {
                cust_id: CustId(driver.user_id.unwrap_or_default()),
                driver_name: driver.clean_user_name(),
                car_class_id: CarClassId(driver.car_class_id.unwrap_or_default()),
                car_class_name: driver.car_class_short_name.clone().unwrap_or_default(),
                car_id: CarId(driver.car_id.unwrap_or_default()),
                car_name: driver.car_screen_name.clone().unwrap_or_default(),
                car_number: driver.car_number.clone().unwrap_or_default(),
                i_rating: driver.i_rating.unwrap_or_default(),
                laps_complete: 0,
                race_position_in_class: 0,
                is_pace_car: driver.is_pace_car(),
                is_spectator: driver.is_spectator(),
                is_self: Some(driver.car_idx) == self_idx,
            };

            if let Some(before) = previous.get(driver.car_idx as usize)
                && before.cust_id == slot.cust_id
            {
                slot.laps_complete = before.laps_complete;
                slot.race_position_in_class = before.race_position_in_class;
            }
        }

        self.self_car_class_id = self
            .cars
            .iter()
            .find(|car| car.is_self && car.is_racing())
            .map(|car| car.car_class_id)
            .or_else(|| self.racing_classes().into_iter().next());
    }

    /// Update laps and class positions from per-car telemetry arrays.
    ///
    /// A missing lap array leaves lap counts untouched. Class positions are always renumbered
    /// from 0 among racing cars: placed cars first by reported position, then unplaced cars by
    /// slot. Without a class position array every racing car counts as unplaced.
    pub fn apply_telemetry(&mut self, vars: &TelemetryVars) {
        if let Some(laps) = vars.ints(LAP_VAR) {
            for (car, &lap) in self.cars.iter_mut().zip(laps) {
                car.laps_complete = u32::try_from(lap).unwrap_or(0);
            }
        }

        let positions = vars.ints(CLASS_POSITION_VAR).unwrap_or_default();

        let mut by_class: BTreeMap<CarClassId, Vec<(bool, i32, usize)>> = BTreeMap::new();
        for (idx, car) in self.cars.iter().enumerate() {
            if !car.is_racing() {
                continue;
            }
            let reported = positions.get(idx).copied().unwrap_or(0);
            let unplaced = reported <= 0;
            by_class.entry(car.car_class_id).or_default().push((unplaced, reported, idx));
        }

        for (car_class_id, mut order) in by_class {
            order.sort_unstable();
            trace!(car_class_id = %car_class_id, cars = order.len(), "Renumbered class positions");
            for (position, (_, _, idx)) in order.into_iter().enumerate() {
                self.cars[idx].race_position_in_class = position as u32;
            }
        }
    }

    /// A one-split results record for the live session, as if it finished now.
    ///
    /// Only racing cars are included.
    pub fn synthetic_result(&self, start_time: DateTime<Utc>) -> RaceResult {
        let mut classes: BTreeMap<CarClassId, ResultCarClass> = BTreeMap::new();
        for car in self.racing_cars() {
            let class = classes.entry(car.car_class_id).or_insert_with(|| ResultCarClass {
                car_class_id: car.car_class_id,
                short_name: car.car_class_name.clone(),
                ..Default::default()
            });
            if !class.cars_in_class.iter().any(|member| member.car_id == car.car_id) {
                class.cars_in_class.push(CarInClass { car_id: car.car_id });
            }
        }

        let results = self
            .racing_cars()
            .map(|car| ResultEntry {
                cust_id: car.cust_id,
                display_name: car.driver_name.clone(),
                finish_position_in_class: car.race_position_in_class,
                laps_complete: car.laps_complete,
                car_id: car.car_id,
                car_class_id: car.car_class_id,
                car_name: car.car_name.clone(),
                new_i_rating: car.i_rating,
            })
            .collect();

        RaceResult {
            session_id: self.session_id,
            subsession_id: self.subsession_id,
            series_id: self.series_id,
            start_time,
            track: ResultTrack {
                track_id: self.track_id,
                track_name: self.track_name.clone(),
                config_name: None,
            },
            car_classes: classes.into_values().collect(),
            session_splits: vec![SessionSplit { subsession_id: self.subsession_id }],
            session_results: vec![SessionResults {
                simsession_name: RACE_SESSION_NAME.to_string(),
                results,
            }],
        }
    }
}
