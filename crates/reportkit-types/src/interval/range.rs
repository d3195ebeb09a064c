use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use super::unit::{IntervalUnit, read_int};
use crate::{Error, Result};

/// The three range shapes an interval can take.
#[derive(Debug, Clone)]
pub enum IntervalRange<P> {
    /// Fixed points on the unit's axis
    Absolute { start: P, end: P },
    /// Offsets in units from "now", evaluated by the server
    Relative { start: i32, end: i32 },
    /// Opaque server-defined expressions
    Custom { start: String, end: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalKind {
    Absolute,
    Relative,
    Custom,
}

impl IntervalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Absolute => "absolute",
            IntervalKind::Relative => "relative",
            IntervalKind::Custom => "custom",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "absolute" => Some(IntervalKind::Absolute),
            "relative" => Some(IntervalKind::Relative),
            "custom" => Some(IntervalKind::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated range over one [`IntervalUnit`].
///
/// Intervals are immutable once built. Two intervals are equal when they
/// have the same shape and serialize to the same JSON; an absolute and a
/// relative interval are never equal, even with matching bounds.
#[derive(Debug, Clone)]
pub struct Interval<U: IntervalUnit> {
    unit: U,
    range: IntervalRange<U::Point>,
}

impl<U: IntervalUnit> Interval<U> {
    /// Create an absolute interval. Fails if `start` is after `end`.
    pub fn absolute(unit: U, start: U::Point, end: U::Point) -> Result<Self> {
        if start > end {
            return Err(range_error(unit, start, end));
        }
        Ok(Self {
            unit,
            range: IntervalRange::Absolute { start, end },
        })
    }

    /// Create a relative interval. For example `MONTH` from -3 to -1 covers
    /// the past three whole calendar months. Fails if `start` is after `end`.
    pub fn relative(unit: U, start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(range_error(unit, start, end));
        }
        Ok(Self {
            unit,
            range: IntervalRange::Relative { start, end },
        })
    }

    /// Create a custom interval from server-side expressions. The
    /// expressions are not parsed, only checked for being non-blank.
    pub fn custom(unit: U, start: impl Into<String>, end: impl Into<String>) -> Result<Self> {
        let start = start.into();
        let end = end.into();
        if start.trim().is_empty() || end.trim().is_empty() {
            return Err(Error::null_interval(
                Some(unit.name()),
                "missing start or end",
            ));
        }
        Ok(Self {
            unit,
            range: IntervalRange::Custom { start, end },
        })
    }

    pub fn unit(&self) -> U {
        self.unit
    }

    pub fn range(&self) -> &IntervalRange<U::Point> {
        &self.range
    }

    pub fn kind(&self) -> IntervalKind {
        match self.range {
            IntervalRange::Absolute { .. } => IntervalKind::Absolute,
            IntervalRange::Relative { .. } => IntervalKind::Relative,
            IntervalRange::Custom { .. } => IntervalKind::Custom,
        }
    }

    pub fn to_json(&self) -> Value {
        let (from, to) = match &self.range {
            IntervalRange::Absolute { start, end } => (
                self.unit.build_absolute_node(start),
                self.unit.build_absolute_node(end),
            ),
            IntervalRange::Relative { start, end } => (json!(start), json!(end)),
            IntervalRange::Custom { start, end } => (json!(start), json!(end)),
        };

        let mut node = Map::new();
        node.insert(
            self.unit.unit_node_name().to_string(),
            json!({
                "interval": {
                    "from": from,
                    "to": to,
                    "type": self.kind().as_str(),
                },
                "aggregationType": self.unit.name(),
            }),
        );
        Value::Object(node)
    }

    /// Parse an interval from its wire object, as returned by the server for
    /// predefined view intervals.
    pub fn from_json(node: &Value) -> Result<Self> {
        let wrapper = node.get(U::NODE_NAME).ok_or_else(|| {
            Error::null_interval(None, format!("missing `{}` node", U::NODE_NAME))
        })?;

        let unit_name = wrapper
            .get("aggregationType")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::null_interval(None, "interval unit may not be absent"))?;
        let unit =
            U::from_name(unit_name).ok_or_else(|| Error::UnknownIntervalUnit(unit_name.to_string()))?;

        let interval = wrapper
            .get("interval")
            .ok_or_else(|| Error::null_interval(Some(unit.name()), "missing `interval` node"))?;
        let (Some(from), Some(to)) = (non_null(interval, "from"), non_null(interval, "to")) else {
            return Err(Error::null_interval(
                Some(unit.name()),
                "interval start and end may not be absent",
            ));
        };

        let kind_name = interval.get("type").and_then(Value::as_str).unwrap_or_default();
        let kind = IntervalKind::parse(kind_name).ok_or_else(|| {
            Error::invalid_node(format!("unknown interval type `{kind_name}`"))
        })?;

        match kind {
            IntervalKind::Absolute => {
                let start = unit.parse_absolute(from)?;
                let end = unit.parse_absolute(to)?;
                Self::absolute(unit, start, end)
            }
            IntervalKind::Relative => {
                let start = offset(interval, "from")?;
                let end = offset(interval, "to")?;
                Self::relative(unit, start, end)
            }
            IntervalKind::Custom => match (from.as_str(), to.as_str()) {
                (Some(start), Some(end)) => Self::custom(unit, start, end),
                _ => Err(Error::invalid_node(format!(
                    "custom interval bounds must be strings: {interval}"
                ))),
            },
        }
    }
}

fn non_null<'a>(node: &'a Value, field: &str) -> Option<&'a Value> {
    node.get(field).filter(|value| !value.is_null())
}

fn offset(node: &Value, field: &str) -> Result<i32> {
    let value = read_int(node, field)?;
    i32::try_from(value)
        .map_err(|_| Error::invalid_node(format!("relative offset out of range: {value}")))
}

fn range_error<U: IntervalUnit>(unit: U, start: impl fmt::Display, end: impl fmt::Display) -> Error {
    Error::InvalidIntervalRange {
        unit: unit.name().to_string(),
        start: start.to_string(),
        end: end.to_string(),
    }
}

impl<U: IntervalUnit> PartialEq for Interval<U> {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_json() == other.to_json()
    }
}

impl<U: IntervalUnit> Eq for Interval<U> {}

impl<U: IntervalUnit> Hash for Interval<U> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_json().to_string().hash(state);
    }
}

impl<U: IntervalUnit> fmt::Display for Interval<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl<U: IntervalUnit> Serialize for Interval<U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
