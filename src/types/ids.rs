//! Strongly-typed identifiers
//!
//! iRacing identifies everything with plain integers. Wrapping them keeps a car ID from being
//! passed where a class ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Raw integer value.
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// iRacing customer (member) ID, the unique key for a driver.
    CustId(i64)
);
id_type!(
    /// Car class ID (e.g. 84 for GTP).
    CarClassId(i32)
);
id_type!(
    /// Car model ID.
    CarId(i32)
);
id_type!(
    /// Session ID shared by every split of one physical race occurrence.
    SessionId(i64)
);
id_type!(
    /// Subsession ID, unique per split.
    SubsessionId(i64)
);
id_type!(
    /// Zero-based split number; 0 is the top split.
    SplitNum(u32)
);
id_type!(
    /// iRacing series ID.
    SeriesId(i32)
);
id_type!(
    /// Track ID.
    TrackId(i32)
);
