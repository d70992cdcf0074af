//! JSON wire encoding of coordinates.
//!
//! The nesting depth of the arrays carries the [`CoordinateKind`]:
//! - `[x,y]` is a point,
//! - `[[x,y],...]` a list,
//! - `[[[x,y],...],...]` a list of lists.
//!
//! Decoding infers the kind by descending through the first element of each
//! level until a number is reached.

use serde_json::Value;

use crate::coord::{Coordinate, NumberFormat};
use crate::coordinate_set::{CoordinateKind, CoordinateSet};

#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Array nesting does not describe a point, list or list of lists.
    InvalidCoordinateDepth { depth: usize },
    /// A leaf is not exactly two finite numbers.
    InvalidCoordinate(String),
    /// A delimited coordinate string could not be parsed.
    Parse(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::InvalidCoordinateDepth { depth } => {
                write!(f, "invalid coordinate nesting depth {depth}")
            }
            CodecError::InvalidCoordinate(reason) => write!(f, "invalid coordinate: {reason}"),
            CodecError::Parse(reason) => write!(f, "coordinate parse error: {reason}"),
        }
    }
}

impl std::error::Error for CodecError {}

pub fn encode(set: &CoordinateSet) -> Value {
    match set.kind() {
        CoordinateKind::Point => match set.as_point() {
            Some(c) => coordinate_value(&c),
            None => Value::Array(Vec::new()),
        },
        CoordinateKind::List => Value::Array(
            set.as_list()
                .unwrap_or_default()
                .iter()
                .map(coordinate_value)
                .collect(),
        ),
        CoordinateKind::MultiList => Value::Array(
            set.as_multi_list()
                .unwrap_or_default()
                .iter()
                .map(|l| Value::Array(l.iter().map(coordinate_value).collect()))
                .collect(),
        ),
    }
}

pub fn encode_coordinate(c: &Coordinate) -> Value {
    coordinate_value(c)
}

fn coordinate_value(c: &Coordinate) -> Value {
    Value::Array(vec![Value::from(c.x()), Value::from(c.y())])
}

/// Nesting depth seen while descending through `value[0]`.
///
/// Returns `Ok(None)` for a top-level `[]`, and the depth at which an empty
/// array was hit as `Err` otherwise. A non-array root has depth 0.
fn infer_depth(value: &Value) -> Result<Option<usize>, usize> {
    let mut depth = 0;
    let mut cur = value;
    loop {
        match cur {
            Value::Array(items) => {
                depth += 1;
                match items.first() {
                    Some(first) => cur = first,
                    None if depth == 1 => return Ok(None),
                    None => return Err(depth),
                }
            }
            Value::Number(_) => return Ok(Some(depth)),
            _ => return Err(depth),
        }
    }
}

/// Infers the kind from array nesting and decodes `value`.
pub fn decode(value: &Value) -> Result<CoordinateSet, CodecError> {
    let depth = match infer_depth(value) {
        Ok(Some(depth)) => depth,
        // `[]`
        Ok(None) => return Ok(CoordinateSet::empty()),
        // `[[]]`: a list of lists whose first list is empty
        Err(2) => 3,
        Err(depth) => return Err(CodecError::InvalidCoordinateDepth { depth }),
    };

    match depth {
        1 => Ok(CoordinateSet::point(parse_leaf(value)?)),
        2 => Ok(CoordinateSet::list(parse_list(value)?)),
        3 => {
            let lists = as_array(value, 3)?;
            let mut out = Vec::with_capacity(lists.len());
            for list in lists {
                out.push(parse_list(list)?);
            }
            Ok(CoordinateSet::multi_list(out))
        }
        depth => Err(CodecError::InvalidCoordinateDepth { depth }),
    }
}

/// Decodes a bare coordinate from `[x,y]` or a delimited string.
pub fn decode_coordinate(value: &Value, format: &NumberFormat) -> Result<Coordinate, CodecError> {
    match value {
        Value::String(s) => Coordinate::parse(s, format),
        Value::Array(_) => parse_leaf(value),
        other => Err(CodecError::InvalidCoordinate(format!(
            "expected array or string, got {other}"
        ))),
    }
}

fn as_array(value: &Value, depth: usize) -> Result<&Vec<Value>, CodecError> {
    value
        .as_array()
        .ok_or(CodecError::InvalidCoordinateDepth { depth })
}

fn parse_list(value: &Value) -> Result<Vec<Coordinate>, CodecError> {
    let items = as_array(value, 2)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(parse_leaf(item)?);
    }
    Ok(out)
}

fn parse_leaf(value: &Value) -> Result<Coordinate, CodecError> {
    let arr = value
        .as_array()
        .ok_or_else(|| CodecError::InvalidCoordinate(format!("expected [x,y], got {value}")))?;
    if arr.len() != 2 {
        return Err(CodecError::InvalidCoordinate(format!(
            "expected 2 components, got {}",
            arr.len()
        )));
    }
    let x = number(&arr[0])?;
    let y = number(&arr[1])?;
    Ok(Coordinate::new(x, y))
}

fn number(value: &Value) -> Result<f64, CodecError> {
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(CodecError::InvalidCoordinate(format!(
            "component must be a finite number, got {value}"
        ))),
    }
}
