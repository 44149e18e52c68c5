//! Events and their splits

use crate::types::{CarClassId, CarId, CustId, SessionId, SplitNum, SubsessionId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One finishing line within a split, before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entrant {
    pub cust_id: CustId,
    /// Zero-based.
    pub finish_position_in_class: u32,
    pub laps_complete: u32,
    pub car_id: CarId,
}

/// One of the parallel races of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub split_num: SplitNum,
    pub subsession_id: SubsessionId,
    pub session_id: SessionId,
    classes: BTreeMap<CarClassId, Vec<Entrant>>,
}

impl Split {
    pub fn new(split_num: SplitNum, subsession_id: SubsessionId, session_id: SessionId) -> Self {
        Self { split_num, subsession_id, session_id, classes: BTreeMap::new() }
    }

    /// Add a finisher. A driver's first record in a class wins; returns `false` for a duplicate.
    pub fn add_entrant(&mut self, car_class_id: CarClassId, entrant: Entrant) -> bool {
        let entrants = self.classes.entry(car_class_id).or_default();
        if entrants.iter().any(|e| e.cust_id == entrant.cust_id) {
            return false;
        }

        let at = entrants.partition_point(|e| {
            (e.finish_position_in_class, e.cust_id)
                <= (entrant.finish_position_in_class, entrant.cust_id)
        });
        entrants.insert(at, entrant);
        true
    }

    /// Entrants of a class in finishing order; empty for a class that did not race here.
    pub fn entrants(&self, car_class_id: CarClassId) -> &[Entrant] {
        self.classes.get(&car_class_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = CarClassId> + '_ {
        self.classes.keys().copied()
    }
}

/// One physical race occurrence, possibly run as several splits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub session_id: SessionId,
    pub start_time: DateTime<Utc>,
    pub track_name: String,
    splits: BTreeMap<SplitNum, Split>,
}

impl Event {
    pub fn new(session_id: SessionId, start_time: DateTime<Utc>, track_name: String) -> Self {
        Self { session_id, start_time, track_name, splits: BTreeMap::new() }
    }

    /// Splits in split-number order.
    pub fn splits(&self) -> impl Iterator<Item = &Split> {
        self.splits.values()
    }

    pub fn split(&self, split_num: SplitNum) -> Option<&Split> {
        self.splits.get(&split_num)
    }

    /// The split for `split_num`, created on first use.
    pub(crate) fn split_mut(&mut self, split_num: SplitNum, subsession_id: SubsessionId) -> &mut Split {
        let session_id = self.session_id;
        self.splits
            .entry(split_num)
            .or_insert_with(|| Split::new(split_num, subsession_id, session_id))
    }
}
