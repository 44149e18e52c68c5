//! Core types shared across the engine.
//!
//! - Identifier newtypes ([`CustId`], [`CarClassId`], [`SubsessionId`], ...) so the many integer
//!   keys iRacing uses cannot be mixed up
//! - [`Points`] with an explicit "not counted" state distinct from a scored zero
//! - [`Value`] and [`TelemetryVars`], the tagged representation of live telemetry variables
//!
//! ## Usage Example
//!
//! ```rust
//! use pitwall_standings::types::{Sample, TelemetryVars, Value};
//!
//! let mut vars = TelemetryVars::new();
//! vars.insert("CarIdxLap", Value::Int(Sample::Array(vec![12, 11, -1])));
//! vars.insert("SessionNum", Value::Int(Sample::Scalar(2)));
//!
//! assert_eq!(vars.ints("CarIdxLap"), Some(&[12, 11, -1][..]));
//! assert_eq!(vars.int("SessionNum"), Some(2));
//! // Type mismatches degrade to None rather than panicking
//! assert_eq!(vars.get("SessionNum").and_then(Value::as_floats), None);
//! ```

mod ids;
mod points;
mod value;

pub use ids::{CarClassId, CarId, CustId, SeriesId, SessionId, SplitNum, SubsessionId, TrackId};
pub use points::Points;
pub use value::{BitField, Sample, TelemetryVars, Value, VariableType};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_sample_slice_matches_contents(values in prop::collection::vec(any::<i32>(), 0..64)) {
            let sample = Sample::Array(values.clone());
            prop_assert_eq!(sample.as_slice(), &values[..]);
            prop_assert_eq!(sample.len(), values.len());
            prop_assert_eq!(sample.first(), values.first());
        }

        #[test]
        fn prop_bitfield_flags(bits in any::<u32>(), bit in 0..32u32) {
            let field = BitField(bits);
            prop_assert_eq!(field.has_flag(1 << bit), bits & (1 << bit) != 0);
        }
    }

    #[test]
    fn variable_type_size_returns_correct_values() {
        assert_eq!(VariableType::Char.size(), 1);
        assert_eq!(VariableType::Bool.size(), 1);
        assert_eq!(VariableType::Int.size(), 4);
        assert_eq!(VariableType::BitField.size(), 4);
        assert_eq!(VariableType::Float.size(), 4);
        assert_eq!(VariableType::Double.size(), 8);
    }

    #[test]
    fn value_reports_its_type_and_count() {
        let laps = Value::Int(Sample::Array(vec![3, 4, 5]));
        assert_eq!(laps.variable_type(), VariableType::Int);
        assert_eq!(laps.count(), 3);

        let flag = Value::Bool(Sample::Scalar(true));
        assert_eq!(flag.variable_type(), VariableType::Bool);
        assert_eq!(flag.count(), 1);
        assert_eq!(flag.as_bools(), Some(&[true][..]));
        assert_eq!(flag.as_ints(), None);
    }

    #[test]
    fn char_values_decode_as_text() {
        let text = Value::Char(Sample::Array(b"RACE\0\0\0".to_vec()));
        assert_eq!(text.as_text().as_deref(), Some("RACE"));
        assert_eq!(Value::Double(Sample::Scalar(1.0)).as_text(), None);
    }

    #[test]
    fn points_distinguish_zero_from_not_counted() {
        assert_eq!(Points::Awarded(0).counted(), Some(0));
        assert_eq!(Points::NotCounted.counted(), None);
        assert!(Points::Awarded(0).is_counted());
        assert!(!Points::NotCounted.is_counted());
        assert_eq!(Points::NotCounted.value_or_zero(), 0);
        assert_eq!(Points::default(), Points::Awarded(0));
    }

    #[test]
    fn ids_display_and_order_like_their_integers() {
        assert_eq!(CustId(455246).to_string(), "455246");
        assert!(SplitNum(0) < SplitNum(1));
        assert_eq!(CarClassId::from(84).get(), 84);
        let json = serde_json::to_string(&SubsessionId(1001)).unwrap();
        assert_eq!(json, "1001");
    }
}
