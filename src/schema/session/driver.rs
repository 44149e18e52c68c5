//! Driver list from the session info
//!
//! Only the fields needed to build live car slots are modelled. The simulator writes booleans
//! as `0`/`1` integers.

use serde::{Deserialize, Serialize};

/// `DriverInfo` block: the local car index plus every car slot in the session.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct DriverInfoData {
    /// Car index of the local driver
    pub driver_car_idx: Option<i32>,
    /// User ID of the local driver
    #[serde(rename = "DriverUserID")]
    pub driver_user_id: Option<i64>,
    /// Car index of the pace car
    pub pace_car_idx: Option<i32>,
    pub drivers: Vec<Driver>,
}

/// One car slot in the `Drivers` list.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Driver {
    pub car_idx: i32,
    pub user_name: String,
    #[serde(rename = "UserID")]
    pub user_id: Option<i64>,
    /// Display number, kept as text since leading zeros matter ("007")
    pub car_number: Option<String>,
    #[serde(rename = "CarClassID")]
    pub car_class_id: Option<i32>,
    pub car_class_short_name: Option<String>,
    #[serde(rename = "CarID")]
    pub car_id: Option<i32>,
    pub car_screen_name: Option<String>,
    pub car_is_pace_car: Option<i32>,
    pub is_spectator: Option<i32>,
    #[serde(rename = "IRating")]
    pub i_rating: Option<i32>,
}

impl Driver {
    pub fn is_pace_car(&self) -> bool {
        self.car_is_pace_car == Some(1)
    }

    pub fn is_spectator(&self) -> bool {
        self.is_spectator == Some(1)
    }

    /// User name with the stray CR/LF the simulator sometimes embeds removed.
    pub fn clean_user_name(&self) -> String {
        self.user_name.chars().filter(|c| *c != '\r' && *c != '\n').collect()
    }
}
