//! Live standings prediction
//!
//! A [`Predictor`] is built once per season/session from the finalized historical records.
//! On first use it ingests them into a baseline [`Season`]; class tables from that baseline are
//! computed the first time each class is asked for and cached from then on.
//!
//! Every [`Predictor::predict`] call works on a copy of the historical records with one
//! synthetic record for the live session appended, so predictions never build on each other.

use crate::config::ChampionshipConfig;
use crate::live::{ClassStanding, LiveSnapshot, PredictedRow, PredictedStandings};
use crate::schema::{RaceResult, parse_results};
use crate::season::Season;
use crate::standings::Standings;
use crate::types::{CarClassId, CustId};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, trace};

/// Finalized season and its lazily built class tables.
#[derive(Debug)]
struct Baseline {
    season: Season,
    tables: Mutex<BTreeMap<CarClassId, Arc<Standings>>>,
}

impl Baseline {
    fn table(&self, car_class_id: CarClassId) -> Arc<Standings> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            tables
                .entry(car_class_id)
                .or_insert_with(|| Arc::new(self.season.standings(car_class_id))),
        )
    }
}

/// Caller-owned prediction context.
///
/// Safe to share behind an [`Arc`]; concurrent first calls build the baseline once.
#[derive(Debug)]
pub struct Predictor {
    config: ChampionshipConfig,
    historical: Vec<RaceResult>,
    baseline: OnceLock<Baseline>,
}

impl Predictor {
    pub fn new(config: ChampionshipConfig, historical: Vec<RaceResult>) -> Self {
        Self { config, historical, baseline: OnceLock::new() }
    }

    /// Build from a JSON results payload. A malformed payload is an error.
    pub fn from_json(config: ChampionshipConfig, json: &str) -> Result<Self> {
        Ok(Self::new(config, parse_results(json)?))
    }

    pub fn config(&self) -> &ChampionshipConfig {
        &self.config
    }

    pub fn historical(&self) -> &[RaceResult] {
        &self.historical
    }

    fn baseline(&self) -> &Baseline {
        self.baseline.get_or_init(|| {
            let mut season = Season::new(&self.config);
            season.load_race_data(&self.historical);
            debug!(
                records = self.historical.len(),
                events = season.events().len(),
                "Built baseline season"
            );
            Baseline { season, tables: Mutex::new(BTreeMap::new()) }
        })
    }

    /// Finalized table for a class, before the live session.
    pub fn current_standings(&self, car_class_id: CarClassId) -> Arc<Standings> {
        self.baseline().table(car_class_id)
    }

    /// Start time given to the synthetic live record: one second after the latest historical
    /// start, so it sorts last.
    pub fn live_start_time(&self) -> DateTime<Utc> {
        self.historical
            .iter()
            .map(|record| record.start_time)
            .max()
            .map(|latest| latest + Duration::seconds(1))
            .unwrap_or_default()
    }

    /// Predicted standings if the live session finished as it stands in `snapshot`.
    pub fn predict(&self, snapshot: &LiveSnapshot) -> PredictedStandings {
        let baseline = self.baseline();

        let mut records = self.historical.clone();
        records.push(snapshot.synthetic_result(self.live_start_time()));
        let mut season = Season::new(&self.config);
        season.load_race_data(&records);

        let car_class_ids = self.report_classes(snapshot, &baseline.season);
        let standings = car_class_ids
            .iter()
            .map(|&car_class_id| {
                let previous = baseline.table(car_class_id);
                let predicted = season.standings(car_class_id);
                (car_class_id, class_standing(snapshot, &previous, &predicted))
            })
            .collect();

        trace!(
            subsession_id = %snapshot.subsession_id,
            classes = car_class_ids.len(),
            racing = snapshot.racing_cars().count(),
            "Predicted standings"
        );

        PredictedStandings {
            status: snapshot.status,
            track_name: snapshot.track_name.clone(),
            count_best_of: self.config.count_best_of,
            self_car_class_id: snapshot.self_car_class_id,
            car_class_ids,
            standings,
        }
    }

    /// Configured classes, else classes racing live, else every class of the season.
    fn report_classes(&self, snapshot: &LiveSnapshot, baseline: &Season) -> Vec<CarClassId> {
        if !self.config.car_class_ids.is_empty() {
            return self.config.car_class_ids.clone();
        }
        let racing = snapshot.racing_classes();
        if racing.is_empty() {
            baseline.class_ids().into_iter().collect()
        } else {
            racing.into_iter().collect()
        }
    }
}

/// Merge the finalized and predicted tables of one class, keyed by driver.
fn class_standing(
    snapshot: &LiveSnapshot,
    previous: &Standings,
    predicted: &Standings,
) -> ClassStanding {
    let car_class_id = predicted.car_class_id;
    let mut rows: BTreeMap<CustId, PredictedRow> = BTreeMap::new();

    for row in &previous.table {
        let merged = rows.entry(row.cust_id).or_default();
        merged.cust_id = row.cust_id;
        merged.driver_name.clone_from(&row.driver_name);
        merged.car_names.clone_from(&row.car_names);
        merged.current_position = row.rank;
        merged.current_points = row.dropped_round_points;
    }

    for row in &predicted.table {
        let merged = rows.entry(row.cust_id).or_default();
        merged.cust_id = row.cust_id;
        if !row.driver_name.is_empty() {
            merged.driver_name.clone_from(&row.driver_name);
        }
        merged.car_names.clone_from(&row.car_names);
        merged.predicted_position = row.rank;
        merged.predicted_points = row.dropped_round_points;
    }

    for car in snapshot.racing_cars().filter(|car| car.car_class_id == car_class_id) {
        if let Some(merged) = rows.get_mut(&car.cust_id) {
            merged.driving = true;
            merged.car_number.clone_from(&car.car_number);
        }
    }

    let mut items: Vec<PredictedRow> = rows
        .into_values()
        .map(|mut row| {
            row.change = row.current_position as i64 - row.predicted_position as i64;
            row
        })
        .collect();
    items.sort_by_key(|row| (row.predicted_position == 0, row.predicted_position, row.cust_id));

    let car_class_name = if predicted.car_class_name.is_empty() {
        snapshot
            .racing_cars()
            .find(|car| car.car_class_id == car_class_id)
            .map(|car| car.car_class_name.clone())
            .unwrap_or_default()
    } else {
        predicted.car_class_name.clone()
    };

    ClassStanding {
        car_class_id,
        car_class_name,
        strength_of_field: snapshot.strength_of_field(car_class_id),
        class_leader_laps_complete: snapshot.leader_laps_complete(car_class_id),
        items,
    }
}
