//! # Championship Standings
//!
//! Aggregates a class's scored positions across the season into one row per driver, applies
//! the best-of-N drop rule, and sorts rows through the tie-break cascade in [`order`].
//!
//! ## Drop rule
//!
//! Only classified, counted results are eligible. The best `count_best_of` of them by points
//! value (stable, so equal values keep chronological order) form the counted subset:
//!
//! - `dropped_round_points`: sum over the counted subset
//! - `all_rounds_points`: sum over every eligible result
//! - `tie_break_positions`, `races_counted`, `total_laps`: over the counted subset
//!
//! A driver with only unclassified or not-counted results still gets a row with zero totals.
//!
//! ```rust
//! use pitwall_standings::standings::{ChampionshipTableRow, order};
//! use pitwall_standings::types::CustId;
//!
//! let mut rows = vec![
//!     ChampionshipTableRow { cust_id: CustId(2), dropped_round_points: 40, ..Default::default() },
//!     ChampionshipTableRow { cust_id: CustId(1), dropped_round_points: 55, ..Default::default() },
//! ];
//! order::sort_and_rank(&mut rows);
//! assert_eq!((rows[0].cust_id, rows[0].rank), (CustId(1), 1));
//! ```

use crate::scoring::Position;
use crate::season::Season;
use crate::types::{CarClassId, CustId, SubsessionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod order;

/// One counted finish kept for tie-breaking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreakPosition {
    pub subsession_id: SubsessionId,
    /// Zero-based finishing position in class.
    pub position: u32,
}

/// One driver's season aggregate in one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionshipTableRow {
    /// 1-based, assigned after sorting.
    pub rank: usize,
    pub cust_id: CustId,
    pub driver_name: String,
    pub i_rating: i32,
    /// Distinct car names driven, sorted.
    pub car_names: Vec<String>,
    pub dropped_round_points: u32,
    pub all_rounds_points: u32,
    pub tie_break_positions: Vec<TieBreakPosition>,
    pub races_counted: usize,
    pub total_laps: u32,
}

/// Sorted championship table for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub car_class_id: CarClassId,
    pub car_class_name: String,
    pub count_best_of: usize,
    pub table: Vec<ChampionshipTableRow>,
}

impl Standings {
    pub fn row(&self, cust_id: CustId) -> Option<&ChampionshipTableRow> {
        self.table.iter().find(|row| row.cust_id == cust_id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// The best `count` eligible positions by points, highest first.
///
/// Eligible means counted (not `NotCounted`), and classified when `classified_only` is set.
/// Equal point values keep their input order.
pub fn best_of(positions: &[Position], count: usize, classified_only: bool) -> Vec<&Position> {
    let mut eligible: Vec<&Position> = positions
        .iter()
        .filter(|p| p.points.is_counted() && (p.classified || !classified_only))
        .collect();
    eligible.sort_by(|a, b| b.points.value_or_zero().cmp(&a.points.value_or_zero()));
    eligible.truncate(count);
    eligible
}

/// Sum of points over positions.
pub fn total_points<'a>(positions: impl IntoIterator<Item = &'a Position>) -> u32 {
    positions.into_iter().map(|p| p.points.value_or_zero()).sum()
}

/// Build the sorted table for `car_class_id` from a loaded season.
pub fn build(season: &Season, car_class_id: CarClassId, count_best_of: usize) -> Standings {
    let mut by_driver: BTreeMap<CustId, Vec<Position>> = BTreeMap::new();
    for position in season.positions(car_class_id) {
        by_driver.entry(position.cust_id).or_default().push(position);
    }

    let mut table: Vec<ChampionshipTableRow> = by_driver
        .into_iter()
        .map(|(cust_id, positions)| aggregate(season, cust_id, &positions, count_best_of))
        .collect();
    order::sort_and_rank(&mut table);

    Standings {
        car_class_id,
        car_class_name: season.registry().class_name(car_class_id).to_string(),
        count_best_of,
        table,
    }
}

fn aggregate(
    season: &Season,
    cust_id: CustId,
    positions: &[Position],
    count_best_of: usize,
) -> ChampionshipTableRow {
    let all_rounds_points = total_points(
        positions.iter().filter(|p| p.classified && p.points.is_counted()),
    );
    let counted = best_of(positions, count_best_of, true);

    let (driver_name, i_rating) = season
        .driver(cust_id)
        .map(|driver| (driver.display_name.clone(), driver.i_rating))
        .unwrap_or_default();

    ChampionshipTableRow {
        rank: 0,
        cust_id,
        driver_name,
        i_rating,
        car_names: season.registry().car_names_driven(positions.iter().map(|p| p.car_id)),
        dropped_round_points: total_points(counted.iter().copied()),
        all_rounds_points,
        tie_break_positions: counted
            .iter()
            .map(|p| TieBreakPosition {
                subsession_id: p.subsession_id,
                position: p.finish_position_in_class,
            })
            .collect(),
        races_counted: counted.len(),
        total_laps: counted.iter().map(|p| p.laps_complete).sum(),
    }
}
