use thiserror::Error;

/// Result type for reportkit-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Construction and parsing errors of the query model.
///
/// These are raised synchronously and never leave a half-built value behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required part of an interval (unit, start or end) was absent or blank
    #[error("invalid interval{}: {reason}", unit_suffix(.unit))]
    NullInterval {
        unit: Option<String>,
        reason: String,
    },

    /// Interval start is ordered after its end
    #[error("invalid {unit} interval: start {start} cannot be after end {end}")]
    InvalidIntervalRange {
        unit: String,
        start: String,
        end: String,
    },

    /// A wire node could not be decoded back into an interval
    #[error("invalid interval node: {0}")]
    InvalidIntervalNode(String),

    /// Aggregation type name outside the closed set of units
    #[error("unknown interval unit: {0}")]
    UnknownIntervalUnit(String),
}

fn unit_suffix(unit: &Option<String>) -> String {
    match unit {
        Some(unit) => format!(" ({unit})"),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn null_interval(unit: Option<&str>, reason: impl Into<String>) -> Self {
        Error::NullInterval {
            unit: unit.map(str::to_string),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_node(message: impl Into<String>) -> Self {
        Error::InvalidIntervalNode(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_interval_message_with_and_without_unit() {
        let with_unit = Error::null_interval(Some("DAY"), "missing start or end");
        assert_eq!(
            with_unit.to_string(),
            "invalid interval (DAY): missing start or end"
        );

        let without_unit = Error::null_interval(None, "interval unit may not be absent");
        assert_eq!(
            without_unit.to_string(),
            "invalid interval: interval unit may not be absent"
        );
    }

    #[test]
    fn test_range_message_carries_bounds() {
        let err = Error::InvalidIntervalRange {
            unit: "MONTH".to_string(),
            start: "2024-03-01".to_string(),
            end: "2024-01-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid MONTH interval: start 2024-03-01 cannot be after end 2024-01-01"
        );
    }
}
