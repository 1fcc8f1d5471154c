//! Row comparison used by the validation strategies.
//!
//! Values compare numerically across integer, real and boolean
//! representations (`1`, `1.0` and `true` are equal), since a correct query
//! may legitimately produce `AVG(x)` where the reference uses `SUM(x) / n`,
//! and lesson authors write booleans in YAML where SQLite stores integers.

use crate::db::{Row, Value};
use std::collections::HashSet;
use tracing::debug;

/// How two result sets ended up being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Order and duplicate count ignored.
    Set,
    /// Row by row, in order.
    Ordered,
}

/// Hashable stand-in for a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey {
    Null,
    Int(i64),
    Float(u64),
    Text(String),
    Bytes(Vec<u8>),
}

/// Returns the set key for a value, or `None` if it cannot take part in set
/// comparison (NaN is not equal to itself).
fn value_key(value: &Value) -> Option<ValueKey> {
    let key = match value {
        Value::Null => ValueKey::Null,
        Value::Float(f) if f.is_nan() => return None,
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => match number(value)? {
            Number::Int(i) => ValueKey::Int(i),
            Number::Float(f) => ValueKey::Float(f.to_bits()),
        },
        Value::String(s) => ValueKey::Text(s.clone()),
        Value::Bytes(b) => ValueKey::Bytes(b.clone()),
    };
    Some(key)
}

fn row_set(rows: &[Row]) -> Option<HashSet<Vec<ValueKey>>> {
    rows.iter()
        .map(|row| row.iter().map(value_key).collect::<Option<Vec<_>>>())
        .collect()
}

/// Compares two scalar values.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bytes(a), Value::Bytes(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        _ => match (number(left), number(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// A numeric value with integral floats folded into integers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    Float(f64),
}

fn number(value: &Value) -> Option<Number> {
    match value {
        Value::Bool(b) => Some(Number::Int(i64::from(*b))),
        Value::Int(i) => Some(Number::Int(*i)),
        Value::Float(f) => Some(integral(*f).map_or(Number::Float(*f), Number::Int)),
        _ => None,
    }
}

/// The integer a float holds exactly, if any.
fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// Compares two row lists positionally: same length, same rows, same order.
pub fn rows_equal_ordered(left: &[Row], right: &[Row]) -> bool {
    left.len() == right.len()
        && left.iter().zip(right).all(|(a, b)| {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        })
}

/// Compares two row lists as sets of tuples.
///
/// Falls back to [`rows_equal_ordered`] for both sides when either contains a
/// value without a set key, and reports which mode was used.
pub fn rows_equal_as_sets(left: &[Row], right: &[Row]) -> (bool, ComparisonMode) {
    match (row_set(left), row_set(right)) {
        (Some(a), Some(b)) => (a == b, ComparisonMode::Set),
        _ => {
            debug!("Result contains values without a set key, comparing in order");
            (rows_equal_ordered(left, right), ComparisonMode::Ordered)
        }
    }
}
