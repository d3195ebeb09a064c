//! Error Tests
//!
//! Verifies error classification and that failed loads leave previously
//! loaded state intact.

use anyhow::Result;
use reportkit_sdk::Error;
use reportkit_sdk::types::DateUnit;
use reportkit_sdk::types::Interval;
use reportkit_testing::{MockTransport, fixtures, init_tracing};

fn dashboard_server() -> MockTransport {
    init_tracing();
    MockTransport::new().route(
        "api/dashboards",
        fixtures::paged_collection("dashboards", fixtures::dashboards(12), 10, 10),
    )
}

#[test]
fn test_failed_load_next_keeps_window() -> Result<()> {
    let mock = dashboard_server();
    let mut list = mock.service().dashboard_info();
    list.load_page(0, 5)?;

    mock.fail_next("api/dashboards", 500);
    assert!(matches!(list.load_next(), Err(Error::InternalError)));

    assert_eq!(list.size(), 5);
    assert_eq!(list.last_loaded_page(), Some(0));
    assert!(list.has_next_page());

    list.load_next()?;
    assert_eq!(list.size(), 10);
    Ok(())
}

#[test]
fn test_failed_reload_keeps_cached_snapshot() -> Result<()> {
    init_tracing();
    let mock = MockTransport::new().route(
        "api/domains",
        fixtures::whole_collection("domains", vec![fixtures::domain("1", "Sales")]),
    );
    let mut domains = mock.service().domain_info();
    domains.load()?;

    mock.disconnect_next("api/domains");
    let err = domains.load().expect_err("disconnect must fail the load");
    assert!(matches!(err, Error::Connection(_)));

    assert!(domains.is_loaded());
    assert_eq!(domains.get().len(), 1);
    Ok(())
}

#[test]
fn test_status_codes_map_to_errors() -> Result<()> {
    let mock = dashboard_server();
    let service = mock.service();

    assert!(matches!(
        service.load_dashboard("404"),
        Err(Error::NotFound { uri }) if uri == "api/dashboards/404"
    ));

    mock.fail_next("api/dashboards", 403);
    assert!(matches!(
        service.dashboard_info().load(),
        Err(Error::Authorization { status: 403, .. })
    ));

    mock.fail_next("api/dashboards", 405);
    assert!(matches!(
        service.dashboard_info().load(),
        Err(Error::MethodNotAllowed { .. })
    ));

    mock.fail_next("api/dashboards", 503);
    assert!(matches!(
        service.dashboard_info().load(),
        Err(Error::UnexpectedResponse { status: 503, .. })
    ));
    Ok(())
}

#[test]
fn test_bad_arguments_send_nothing() {
    let mock = dashboard_server();
    let mut list = mock.service().dashboard_info();

    assert!(matches!(list.load_with_size(0), Err(Error::InvalidArgument(_))));
    assert!(mock.requests().is_empty());
}

#[test]
fn test_interval_errors_convert() {
    fn build() -> reportkit_sdk::Result<Interval<DateUnit>> {
        Ok(Interval::relative(DateUnit::Day, 3, -3)?)
    }
    let err = build().unwrap_err();
    assert!(matches!(err, Error::Interval(_)));
    assert!(err.to_string().contains("DAY"));
}
