//! Stream adapters for prediction subscribers

mod throttle;

pub use throttle::{Throttle, ThrottleExt};
