//! Date and time intervals.
//!
//! An interval pairs a granularity ([`DateUnit`] or [`TimeUnit`]) with one of
//! three range shapes and serializes to the tagged wire object:
//!
//! ```text
//! { "dateInterval": { "interval": { "from": .., "to": .., "type": "absolute" },
//!                     "aggregationType": "MONTH" } }
//! ```

pub mod range;
pub mod unit;

pub use range::{Interval, IntervalKind, IntervalRange};
pub use unit::{DateUnit, IntervalUnit, TimeUnit};
