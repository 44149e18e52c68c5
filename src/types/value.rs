//! Tagged telemetry values
//!
//! The simulator publishes each variable as one of six wire types, either as a single value or
//! as a fixed-size per-car array (`CarIdx*` variables). [`Value`] carries the typed payload so
//! read sites match on the variant instead of casting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Variable types published by the simulator (irsdk_VarType).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    Char,
    Bool,
    Int,
    BitField,
    Float,
    Double,
}

impl VariableType {
    /// Size in bytes of one element (irsdk_VarTypeBytes).
    pub const fn size(&self) -> usize {
        match self {
            VariableType::Char | VariableType::Bool => 1,
            VariableType::Int | VariableType::BitField | VariableType::Float => 4,
            VariableType::Double => 8,
        }
    }
}

/// 32-bit flag set such as `SessionFlags` or `CarIdxSessionFlags`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitField(pub u32);

impl BitField {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.0 & flag != 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

/// One value or a per-car array of values of the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample<T> {
    Scalar(T),
    Array(Vec<T>),
}

impl<T> Sample<T> {
    /// Scalar value, or the first array element.
    pub fn first(&self) -> Option<&T> {
        match self {
            Sample::Scalar(value) => Some(value),
            Sample::Array(values) => values.first(),
        }
    }

    /// Elements as a slice; a scalar is a one-element slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Sample::Scalar(value) => std::slice::from_ref(value),
            Sample::Array(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Runtime value of one telemetry variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Char(Sample<u8>),
    Bool(Sample<bool>),
    Int(Sample<i32>),
    BitField(Sample<BitField>),
    Float(Sample<f32>),
    Double(Sample<f64>),
}

impl Value {
    pub fn variable_type(&self) -> VariableType {
        match self {
            Value::Char(_) => VariableType::Char,
            Value::Bool(_) => VariableType::Bool,
            Value::Int(_) => VariableType::Int,
            Value::BitField(_) => VariableType::BitField,
            Value::Float(_) => VariableType::Float,
            Value::Double(_) => VariableType::Double,
        }
    }

    /// Number of elements (1 for scalars).
    pub fn count(&self) -> usize {
        match self {
            Value::Char(s) => s.len(),
            Value::Bool(s) => s.len(),
            Value::Int(s) => s.len(),
            Value::BitField(s) => s.len(),
            Value::Float(s) => s.len(),
            Value::Double(s) => s.len(),
        }
    }

    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            Value::Int(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        self.as_ints().and_then(|values| values.first().copied())
    }

    pub fn as_bools(&self) -> Option<&[bool]> {
        match self {
            Value::Bool(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Value::Float(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    /// Char arrays hold NUL-padded text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Char(s) => {
                let bytes = s.as_slice();
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }
            _ => None,
        }
    }
}

/// One refresh worth of telemetry variables, keyed by variable name.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryVars {
    vars: HashMap<String, Value>,
}

impl TelemetryVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.vars.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Integer array by name. Missing variables and type mismatches both yield `None`.
    pub fn ints(&self, name: &str) -> Option<&[i32]> {
        self.get(name).and_then(Value::as_ints)
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<(String, Value)> for TelemetryVars {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { vars: iter.into_iter().collect() }
    }
}
