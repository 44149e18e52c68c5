//! Predicted standings as presented to a consumer
//!
//! Everything here is plain data with `Serialize`, so a UI layer can render it directly or
//! ship it as JSON.

use crate::live::ConnectionStatus;
use crate::types::{CarClassId, CustId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One driver's line in a predicted class table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedRow {
    /// In a racing car in the live session.
    pub driving: bool,
    pub cust_id: CustId,
    pub driver_name: String,
    /// Blank for drivers not in the live session.
    pub car_number: String,
    /// Rank before the live race, 0 if unranked.
    pub current_position: usize,
    /// Rank if the live race finished now, 0 if unranked.
    pub predicted_position: usize,
    pub current_points: u32,
    pub predicted_points: u32,
    /// Positions gained; positive moves up the table.
    pub change: i64,
    pub car_names: Vec<String>,
}

impl PredictedRow {
    pub fn points_gained(&self) -> i64 {
        i64::from(self.predicted_points) - i64::from(self.current_points)
    }
}

/// Predicted table for one class in the live session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStanding {
    pub car_class_id: CarClassId,
    pub car_class_name: String,
    /// Mean iRating of the class's racing cars.
    pub strength_of_field: i32,
    pub class_leader_laps_complete: u32,
    /// Sorted by predicted position; unranked rows last.
    pub items: Vec<PredictedRow>,
}

impl ClassStanding {
    /// The first `n` rows.
    pub fn top(&self, n: usize) -> &[PredictedRow] {
        &self.items[..n.min(self.items.len())]
    }

    pub fn row(&self, cust_id: CustId) -> Option<&PredictedRow> {
        self.items.iter().find(|row| row.cust_id == cust_id)
    }

    pub fn driving(&self) -> impl Iterator<Item = &PredictedRow> {
        self.items.iter().filter(|row| row.driving)
    }
}

/// Predicted standings for every class of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedStandings {
    pub status: ConnectionStatus,
    pub track_name: String,
    pub count_best_of: usize,
    /// Class of the local driver, falling back to the first racing class.
    pub self_car_class_id: Option<CarClassId>,
    pub car_class_ids: Vec<CarClassId>,
    pub standings: BTreeMap<CarClassId, ClassStanding>,
}

impl PredictedStandings {
    pub fn class(&self, car_class_id: CarClassId) -> Option<&ClassStanding> {
        self.standings.get(&car_class_id)
    }

    /// The local driver's class table, if it is one of the predicted classes.
    pub fn own_class(&self) -> Option<&ClassStanding> {
        self.self_car_class_id.and_then(|id| self.class(id))
    }

    /// JSON rendering for external consumers.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cust_id: i64, predicted_position: usize, driving: bool) -> PredictedRow {
        PredictedRow {
            driving,
            cust_id: CustId(cust_id),
            predicted_position,
            current_points: 30,
            predicted_points: 25 + predicted_position as u32,
            ..Default::default()
        }
    }

    #[test]
    fn top_clamps_to_length() {
        let class = ClassStanding {
            items: vec![row(1, 1, true), row(2, 2, false), row(3, 3, true)],
            ..Default::default()
        };
        assert_eq!(class.top(2).len(), 2);
        assert_eq!(class.top(10).len(), 3);
        assert_eq!(class.driving().count(), 2);
        assert_eq!(class.row(CustId(2)).map(|r| r.points_gained()), Some(-3));
    }

    #[test]
    fn own_class_follows_self_class() {
        let mut standings = PredictedStandings {
            self_car_class_id: Some(CarClassId(84)),
            ..Default::default()
        };
        assert!(standings.own_class().is_none());

        standings.standings.insert(
            CarClassId(84),
            ClassStanding { car_class_id: CarClassId(84), ..Default::default() },
        );
        assert_eq!(standings.own_class().map(|c| c.car_class_id), Some(CarClassId(84)));
    }

    #[test]
    fn renders_json_with_status() {
        let standings =
            PredictedStandings { status: ConnectionStatus::Connected, ..Default::default() };
        let json = standings.to_json().unwrap();
        assert!(json.contains("\"status\":\"Connected\""));
    }
}
