use std::fmt;
use std::hash::Hash;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Error, Result};

/// Granularity of an interval.
///
/// The set of units is closed: [`DateUnit`] covers the date axis and
/// [`TimeUnit`] the time-of-day axis. Each unit renders a point into a JSON
/// object holding only the fields relevant to its granularity, and parses
/// such an object back with the finer fields zeroed.
pub trait IntervalUnit: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Point on the unit's axis
    type Point: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync;

    /// Wire-level wrapper key, `dateInterval` or `timeInterval`
    const NODE_NAME: &'static str;

    /// Every unit of this axis
    const ALL: &'static [Self];

    /// Aggregation type name, e.g. `DAY`
    fn name(&self) -> &'static str;

    fn build_absolute_node(&self, point: &Self::Point) -> Value;

    fn parse_absolute(&self, node: &Value) -> Result<Self::Point>;

    /// Drop everything finer than this unit, so that
    /// `parse_absolute(build_absolute_node(p)) == truncate(p)`.
    fn truncate(&self, point: &Self::Point) -> Self::Point;

    fn unit_node_name(&self) -> &'static str {
        Self::NODE_NAME
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|unit| unit.name() == name)
    }
}

/// Units for date intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DateUnit {
    Day,
    /// ISO 8601 week: the year is the ISO week-numbering year
    Week,
    Month,
    /// Quarter index in the wire format is zero-based
    Quarter,
    Year,
}

impl IntervalUnit for DateUnit {
    type Point = NaiveDate;

    const NODE_NAME: &'static str = "dateInterval";

    const ALL: &'static [Self] = &[
        DateUnit::Day,
        DateUnit::Week,
        DateUnit::Month,
        DateUnit::Quarter,
        DateUnit::Year,
    ];

    fn name(&self) -> &'static str {
        match self {
            DateUnit::Day => "DAY",
            DateUnit::Week => "WEEK",
            DateUnit::Month => "MONTH",
            DateUnit::Quarter => "QUARTER",
            DateUnit::Year => "YEAR",
        }
    }

    fn build_absolute_node(&self, date: &NaiveDate) -> Value {
        match self {
            DateUnit::Day => json!({
                "year": date.year(),
                "month": date.month(),
                "day": date.day(),
            }),
            DateUnit::Week => {
                let week = date.iso_week();
                json!({ "year": week.year(), "week": week.week() })
            }
            DateUnit::Month => json!({ "year": date.year(), "month": date.month() }),
            DateUnit::Quarter => json!({ "year": date.year(), "quarter": date.month0() / 3 }),
            DateUnit::Year => json!({ "year": date.year() }),
        }
    }

    fn parse_absolute(&self, node: &Value) -> Result<NaiveDate> {
        let year = read_i32(node, "year")?;
        let date = match self {
            DateUnit::Day => NaiveDate::from_ymd_opt(
                year,
                read_u32(node, "month")?,
                read_u32(node, "day")?,
            ),
            DateUnit::Week => {
                NaiveDate::from_isoywd_opt(year, read_u32(node, "week")?, Weekday::Mon)
            }
            DateUnit::Month => NaiveDate::from_ymd_opt(year, read_u32(node, "month")?, 1),
            DateUnit::Quarter => {
                let quarter = read_u32(node, "quarter")?;
                if quarter > 3 {
                    return Err(Error::invalid_node(format!(
                        "quarter {quarter} is out of range 0..=3"
                    )));
                }
                NaiveDate::from_ymd_opt(year, quarter * 3 + 1, 1)
            }
            DateUnit::Year => NaiveDate::from_ymd_opt(year, 1, 1),
        };
        date.ok_or_else(|| Error::invalid_node(format!("{} node {node} is not a valid date", self.name())))
    }

    fn truncate(&self, date: &NaiveDate) -> NaiveDate {
        let truncated = match self {
            DateUnit::Day => Some(*date),
            DateUnit::Week => Some(
                *date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            ),
            DateUnit::Month => date.with_day(1),
            DateUnit::Quarter => NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1),
            DateUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        };
        // Every branch lands on an existing day of the same or an earlier month.
        truncated.unwrap_or(*date)
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Units for time-of-day intervals, on the 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
}

impl IntervalUnit for TimeUnit {
    type Point = NaiveTime;

    const NODE_NAME: &'static str = "timeInterval";

    const ALL: &'static [Self] = &[TimeUnit::Second, TimeUnit::Minute, TimeUnit::Hour];

    fn name(&self) -> &'static str {
        match self {
            TimeUnit::Second => "SECOND",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Hour => "HOUR",
        }
    }

    fn build_absolute_node(&self, time: &NaiveTime) -> Value {
        match self {
            TimeUnit::Second => json!({
                "hour": time.hour(),
                "minute": time.minute(),
                "second": time.second(),
            }),
            TimeUnit::Minute => json!({ "hour": time.hour(), "minute": time.minute() }),
            TimeUnit::Hour => json!({ "hour": time.hour() }),
        }
    }

    fn parse_absolute(&self, node: &Value) -> Result<NaiveTime> {
        let hour = read_u32(node, "hour")?;
        let time = match self {
            TimeUnit::Second => NaiveTime::from_hms_opt(
                hour,
                read_u32(node, "minute")?,
                read_u32(node, "second")?,
            ),
            TimeUnit::Minute => NaiveTime::from_hms_opt(hour, read_u32(node, "minute")?, 0),
            TimeUnit::Hour => NaiveTime::from_hms_opt(hour, 0, 0),
        };
        time.ok_or_else(|| Error::invalid_node(format!("{} node {node} is not a valid time", self.name())))
    }

    fn truncate(&self, time: &NaiveTime) -> NaiveTime {
        let truncated = match self {
            TimeUnit::Second => NaiveTime::from_hms_opt(time.hour(), time.minute(), time.second()),
            TimeUnit::Minute => NaiveTime::from_hms_opt(time.hour(), time.minute(), 0),
            TimeUnit::Hour => NaiveTime::from_hms_opt(time.hour(), 0, 0),
        };
        truncated.unwrap_or(*time)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Read an integer field that the server may send as an integer, a float,
/// or a numeric string. Fractions are truncated.
pub(crate) fn read_int(node: &Value, field: &str) -> Result<i64> {
    let value = node
        .get(field)
        .ok_or_else(|| Error::invalid_node(format!("missing field `{field}` in {node}")))?;

    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64),
        _ => None,
    };

    parsed.ok_or_else(|| Error::invalid_node(format!("field `{field}` is not numeric: {value}")))
}

fn read_i32(node: &Value, field: &str) -> Result<i32> {
    let value = read_int(node, field)?;
    i32::try_from(value)
        .map_err(|_| Error::invalid_node(format!("field `{field}` is out of range: {value}")))
}

fn read_u32(node: &Value, field: &str) -> Result<u32> {
    let value = read_int(node, field)?;
    u32::try_from(value)
        .map_err(|_| Error::invalid_node(format!("field `{field}` is out of range: {value}")))
}
