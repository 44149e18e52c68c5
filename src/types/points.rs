//! Championship points for one scored result

use serde::{Deserialize, Serialize};

/// Points awarded for one finish.
///
/// `NotCounted` marks a split excluded from the series entirely and is distinct from a scored
/// zero: a zero still counts as a race towards best-of-N, a `NotCounted` result never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Points {
    Awarded(u32),
    NotCounted,
}

impl Points {
    /// Points value if this result counts towards the championship.
    pub fn counted(self) -> Option<u32> {
        match self {
            Points::Awarded(points) => Some(points),
            Points::NotCounted => None,
        }
    }

    pub fn is_counted(self) -> bool {
        matches!(self, Points::Awarded(_))
    }

    /// Points value with `NotCounted` treated as zero.
    pub fn value_or_zero(self) -> u32 {
        self.counted().unwrap_or(0)
    }
}

impl Default for Points {
    fn default() -> Self {
        Points::Awarded(0)
    }
}

impl From<u32> for Points {
    fn from(points: u32) -> Self {
        Points::Awarded(points)
    }
}
