//! reportkit-sdk: client-side data access for a reporting server.
//!
//! # Overview
//!
//! The SDK turns a request/response [`Transport`] into typed access to
//! dashboards, reports, data sets, domains and views. Large collections are
//! exposed as [`PaginatedList`]s that load page by page, smaller ones as
//! [`CachedList`]s that load whole. View content is requested through a
//! [`ViewLoader`] that carries filters and date/time intervals in the
//! server's wire format.
//!
//! # Quickstart
//!
//! ```no_run
//! use reportkit_sdk::{Request, Response, Service, ViewType};
//! use reportkit_sdk::types::{DateUnit, FilterOperation, Interval, UnresolvedAttribute};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Any `Fn(&Request) -> anyhow::Result<Response>` is a transport
//! let service = Service::new(|request: &Request| -> anyhow::Result<Response> {
//!     unimplemented!("send {} {}", request.method, request.path)
//! });
//!
//! // Page through reports
//! let mut reports = service.report_info();
//! reports.load_with_size(20)?;
//! while reports.has_next_page() {
//!     reports.load_next()?;
//! }
//!
//! // Load a chart for the last three months in two regions
//! let filter = FilterOperation::IN.create_filter(UnresolvedAttribute::new("ds-1", "L_REGION"));
//! let content = service
//!     .setup_view_loader("view-1", ViewType::Chart)
//!     .add_filter(filter)
//!     .set_date_interval(Interval::relative(DateUnit::Month, -3, 0)?)
//!     .load_content()?;
//! println!("{content}");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `reportkit-types`: intervals, filters and resource elements; no I/O
//! - [`Service`]: resource paths, status handling and the list factories
//! - [`PaginatedList`] / [`CachedCollection`]: load state over a [`ListSource`]
//! - [`Transport`]: supplied by the caller
//!
//! Nothing is retried. A failed load returns the error and leaves the list,
//! cache or loader as it was.

pub mod cache;
pub mod config;
pub mod error;
pub mod paging;
pub mod service;
pub mod source;
pub mod transport;
pub mod view;

pub use cache::{CachedCollection, CachedList};
pub use config::Config;
pub use error::{Error, Result};
pub use paging::{PageWindow, PaginatedIdList, PaginatedList};
pub use service::Service;
pub use source::ListSource;
pub use transport::{Method, Request, Response, Transport};
pub use view::{ViewLoader, ViewType};

/// The data model, re-exported.
pub mod types {
    pub use reportkit_types::*;
}
