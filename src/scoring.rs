//! Classification and points for one split
//!
//! A finisher is *classified* when they completed at least 75% of their class winner's laps.
//! Classified or not, each finisher is awarded points from the split's schedule; whether
//! unclassified points count is decided later by the standings builder.
//!
//! ```rust
//! use pitwall_standings::scoring::{PointsSchedule, is_classified};
//! use pitwall_standings::types::{Points, SplitNum};
//!
//! let schedule = PointsSchedule::from_iter([(SplitNum(0), vec![25, 22, 20, 18])]);
//! assert_eq!(schedule.award(SplitNum(0), 0), Points::Awarded(25));
//! assert_eq!(schedule.award(SplitNum(0), 4), Points::Awarded(0));
//! assert_eq!(schedule.award(SplitNum(1), 0), Points::NotCounted);
//!
//! assert!(is_classified(13, 10));
//! assert!(!is_classified(14, 10));
//! ```

use crate::season::Split;
use crate::types::{CarClassId, CarId, CustId, Points, SplitNum, SubsessionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points by zero-based finishing position, per split.
///
/// A split absent from the schedule is not scored at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsSchedule {
    splits: BTreeMap<SplitNum, Vec<u32>>,
}

impl PointsSchedule {
    pub fn new(splits: BTreeMap<SplitNum, Vec<u32>>) -> Self {
        Self { splits }
    }

    /// Points for finishing `position` (zero-based) in `split`.
    pub fn award(&self, split: SplitNum, position: u32) -> Points {
        match self.splits.get(&split) {
            None => Points::NotCounted,
            Some(table) => {
                Points::Awarded(table.get(position as usize).copied().unwrap_or_default())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SplitNum, &[u32])> {
        self.splits.iter().map(|(split, table)| (*split, table.as_slice()))
    }
}

impl Default for PointsSchedule {
    /// Three scored splits: a 20-deep top split, then 12 and 6 deep.
    fn default() -> Self {
        Self::from_iter([
            (
                SplitNum(0),
                vec![25, 22, 20, 18, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1],
            ),
            (SplitNum(1), vec![14, 12, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]),
            (SplitNum(2), vec![9, 6, 4, 3, 2, 1]),
        ])
    }
}

impl FromIterator<(SplitNum, Vec<u32>)> for PointsSchedule {
    fn from_iter<I: IntoIterator<Item = (SplitNum, Vec<u32>)>>(iter: I) -> Self {
        Self { splits: iter.into_iter().collect() }
    }
}

/// Whether `laps_complete` is at least 75% of `winner_laps`.
pub fn is_classified(winner_laps: u32, laps_complete: u32) -> bool {
    u64::from(laps_complete) * 4 >= u64::from(winner_laps) * 3
}

/// One driver's scored outcome in one class of one split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub cust_id: CustId,
    pub subsession_id: SubsessionId,
    pub split_num: SplitNum,
    /// Zero-based.
    pub finish_position_in_class: u32,
    pub laps_complete: u32,
    pub car_id: CarId,
    pub classified: bool,
    pub points: Points,
}

/// Score every entrant of `car_class_id` in `split`.
///
/// Positions are returned in finishing order. A class with no completed laps scores zero for
/// everyone, unclassified; an unscheduled split is `NotCounted` regardless.
pub fn score(split: &Split, car_class_id: CarClassId, schedule: &PointsSchedule) -> Vec<Position> {
    let entrants = split.entrants(car_class_id);
    let winner_laps = entrants.iter().map(|e| e.laps_complete).max().unwrap_or(0);

    entrants
        .iter()
        .map(|entrant| {
            let started = winner_laps > 0;
            let points = match schedule.award(split.split_num, entrant.finish_position_in_class) {
                Points::Awarded(_) if !started => Points::Awarded(0),
                points => points,
            };

            Position {
                cust_id: entrant.cust_id,
                subsession_id: split.subsession_id,
                split_num: split.split_num,
                finish_position_in_class: entrant.finish_position_in_class,
                laps_complete: entrant.laps_complete,
                car_id: entrant.car_id,
                classified: started && is_classified(winner_laps, entrant.laps_complete),
                points,
            }
        })
        .collect()
}
