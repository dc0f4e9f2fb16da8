//! Extraction helpers shared by the source normalizers.
//!
//! Each source has its own page normalizer (see `ticketmaster::normalize`
//! and `predicthq::normalize`). They share the defensive policy implemented
//! here: look a value up, and fall back to a default instead of failing.

use cityevents_core::Coordinate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Returns the array found by following `path` from `root`, if every step exists.
pub(crate) fn array_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a [Value]> {
    path.iter()
        .try_fold(root, |node, key| node.get(*key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

/// Returns the unsigned integer found by following `path` from `root`.
///
/// Integral floats and numeric strings are accepted; APIs are not always
/// consistent about numeric encodings.
pub(crate) fn u64_at(root: &Value, path: &[&str]) -> Option<u64> {
    let node = path.iter().try_fold(root, |node, key| node.get(*key))?;
    match node {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a coordinate from a JSON number or numeric string.
pub(crate) fn coordinate_from_json(value: Option<&Value>) -> Coordinate {
    match value {
        Some(Value::Number(n)) => Coordinate::from(n.as_f64()),
        Some(Value::String(s)) => Coordinate::parse(s),
        _ => Coordinate::Unknown,
    }
}

/// Deserializes one raw item, logging and returning `None` if its shape is unreadable.
pub(crate) fn parse_item<'a, T>(source: &str, index: usize, raw: &'a Value) -> Option<T>
where
    T: Deserialize<'a>,
{
    match T::deserialize(raw) {
        Ok(item) => Some(item),
        Err(e) => {
            warn!(source, index, error = %e, "skipping unreadable event item");
            None
        }
    }
}
