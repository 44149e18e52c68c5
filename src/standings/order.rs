//! Tie-break cascade
//!
//! Rows are ordered by a list of comparators combined lexicographically: the first comparator
//! that tells two rows apart decides. The final comparator (customer ID) never returns `Equal`
//! for distinct drivers, so the order is total and independent of input order.

use super::ChampionshipTableRow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Comparator over standings rows.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Combine comparators, first non-equal result wins.
pub fn lexicographic<T>(comparators: &[Comparator<T>]) -> impl Fn(&T, &T) -> Ordering + '_ {
    move |a, b| {
        comparators
            .iter()
            .map(|compare| compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Championship ordering, best row first.
pub const CASCADE: [Comparator<ChampionshipTableRow>; 5] = [
    by_dropped_round_points,
    by_all_rounds_points,
    by_finish_histogram,
    by_i_rating,
    by_cust_id,
];

pub fn by_dropped_round_points(a: &ChampionshipTableRow, b: &ChampionshipTableRow) -> Ordering {
    b.dropped_round_points.cmp(&a.dropped_round_points)
}

pub fn by_all_rounds_points(a: &ChampionshipTableRow, b: &ChampionshipTableRow) -> Ordering {
    b.all_rounds_points.cmp(&a.all_rounds_points)
}

/// More finishes at the best position where the two rows differ wins.
pub fn by_finish_histogram(a: &ChampionshipTableRow, b: &ChampionshipTableRow) -> Ordering {
    let a_counts = histogram(a);
    let b_counts = histogram(b);

    let mut positions: Vec<u32> = a_counts.keys().chain(b_counts.keys()).copied().collect();
    positions.sort_unstable();
    positions.dedup();

    positions
        .into_iter()
        .map(|p| {
            let a_count = a_counts.get(&p).copied().unwrap_or(0);
            let b_count = b_counts.get(&p).copied().unwrap_or(0);
            b_count.cmp(&a_count)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub fn by_i_rating(a: &ChampionshipTableRow, b: &ChampionshipTableRow) -> Ordering {
    b.i_rating.cmp(&a.i_rating)
}

pub fn by_cust_id(a: &ChampionshipTableRow, b: &ChampionshipTableRow) -> Ordering {
    a.cust_id.cmp(&b.cust_id)
}

fn histogram(row: &ChampionshipTableRow) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for tie_break in &row.tie_break_positions {
        *counts.entry(tie_break.position).or_insert(0) += 1;
    }
    counts
}

/// Sort rows by [`CASCADE`] and assign dense ranks from 1.
pub fn sort_and_rank(rows: &mut [ChampionshipTableRow]) {
    rows.sort_by(lexicographic(&CASCADE));
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::TieBreakPosition;
    use crate::types::{CustId, SubsessionId};
    use proptest::prelude::*;

    fn row(
        cust_id: i64,
        dropped: u32,
        all: u32,
        finishes: &[u32],
        i_rating: i32,
    ) -> ChampionshipTableRow {
        ChampionshipTableRow {
            cust_id: CustId(cust_id),
            driver_name: format!("Driver {cust_id}"),
            i_rating,
            dropped_round_points: dropped,
            all_rounds_points: all,
            tie_break_positions: finishes
                .iter()
                .enumerate()
                .map(|(i, &position)| TieBreakPosition {
                    subsession_id: SubsessionId(i as i64),
                    position,
                })
                .collect(),
            races_counted: finishes.len(),
            ..Default::default()
        }
    }

    fn ranked_ids(mut rows: Vec<ChampionshipTableRow>) -> Vec<i64> {
        sort_and_rank(&mut rows);
        rows.iter().map(|r| r.cust_id.0).collect()
    }

    #[test]
    fn lexicographic_uses_first_difference() {
        let by_first: Comparator<(u8, u8)> = |a, b| a.0.cmp(&b.0);
        let by_second: Comparator<(u8, u8)> = |a, b| a.1.cmp(&b.1);
        let comparators = [by_first, by_second];
        let compare = lexicographic(&comparators);

        assert_eq!(compare(&(1, 9), &(2, 0)), Ordering::Less);
        assert_eq!(compare(&(1, 1), &(1, 2)), Ordering::Less);
        assert_eq!(compare(&(1, 1), &(1, 1)), Ordering::Equal);
        assert_eq!(lexicographic::<u8>(&[])(&1, &2), Ordering::Equal);
    }

    #[test]
    fn dropped_points_then_all_rounds_points() {
        let rows = vec![
            row(1, 20, 20, &[5], 1000),
            row(2, 23, 25, &[3], 1000),
            row(3, 23, 26, &[3], 1000),
            row(4, 22, 22, &[4], 1000),
        ];
        assert_eq!(ranked_ids(rows), vec![3, 2, 4, 1]);
    }

    #[test]
    fn histogram_prefers_more_better_finishes() {
        // Same points; row 2 has two wins, row 1 one win and a second place
        let rows = vec![row(1, 50, 50, &[0, 1, 1], 3000), row(2, 50, 50, &[0, 0, 9], 1000)];
        assert_eq!(ranked_ids(rows), vec![2, 1]);

        // Identical up to position 4, row 1 has the extra 5th place
        let rows = vec![row(1, 30, 30, &[2, 5], 1000), row(2, 30, 30, &[2], 1000)];
        assert_eq!(ranked_ids(rows), vec![1, 2]);
    }

    #[test]
    fn i_rating_then_cust_id_settle_remaining_ties() {
        let rows = vec![row(7, 0, 0, &[], 1500), row(5, 0, 0, &[], 2500), row(3, 0, 0, &[], 1500)];
        assert_eq!(ranked_ids(rows), vec![5, 3, 7]);
    }

    #[test]
    fn four_row_cascade_leaves_no_tie() {
        let mut rows = vec![
            row(1, 20, 20, &[1], 1000),
            row(2, 23, 23, &[1, 4], 1000),
            row(3, 23, 23, &[1, 4], 1200),
            row(4, 22, 22, &[2], 1000),
        ];
        sort_and_rank(&mut rows);

        let ranks: Vec<(i64, usize)> = rows.iter().map(|r| (r.cust_id.0, r.rank)).collect();
        assert_eq!(ranks, vec![(3, 1), (2, 2), (4, 3), (1, 4)]);
    }

    fn arb_row() -> impl Strategy<Value = ChampionshipTableRow> {
        (
            0..1000i64,
            0..60u32,
            0..60u32,
            prop::collection::vec(0..8u32, 0..5),
            prop::sample::select(vec![1000, 1500, 2000]),
        )
            .prop_map(|(id, dropped, extra, finishes, rating)| {
                row(id, dropped, dropped + extra, &finishes, rating)
            })
    }

    proptest! {
        #[test]
        fn prop_ranks_are_dense_and_order_is_input_independent(
            rows in prop::collection::vec(arb_row(), 0..20)
        ) {
            let mut unique = rows;
            unique.sort_by_key(|r| r.cust_id);
            unique.dedup_by_key(|r| r.cust_id);

            let mut forward = unique.clone();
            let mut reversed: Vec<_> = unique.into_iter().rev().collect();
            sort_and_rank(&mut forward);
            sort_and_rank(&mut reversed);

            prop_assert_eq!(&forward, &reversed);
            for (i, r) in forward.iter().enumerate() {
                prop_assert_eq!(r.rank, i + 1);
            }
            for pair in forward.windows(2) {
                prop_assert!(pair[0].dropped_round_points >= pair[1].dropped_round_points);
            }
        }
    }
}
