//! Query model shared by every reportkit layer.
//!
//! This crate is pure data: it knows how filters and date/time intervals are
//! encoded on the wire and how resource elements are decoded, but it never
//! talks to a server. The `reportkit-sdk` crate builds on these types to
//! issue requests.

pub mod error;
pub mod filter;
pub mod interval;
pub mod resource;

pub use error::{Error, Result};
pub use filter::*;
pub use interval::*;
pub use resource::*;
