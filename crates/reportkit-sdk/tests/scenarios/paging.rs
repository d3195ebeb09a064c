//! Paging Tests
//!
//! Verifies window bookkeeping of paginated lists against a server that
//! pages, defaults and caps like the real one.

use anyhow::Result;
use reportkit_sdk::{Error, PaginatedIdList};
use reportkit_sdk::types::ReportInfo;
use reportkit_testing::assertions::{assert_query_param, assert_unpaged};
use reportkit_testing::{MockTransport, fixtures, init_tracing};

fn report_server(total: usize) -> MockTransport {
    init_tracing();
    MockTransport::new().route(
        "api/reports",
        fixtures::paged_collection("reports", fixtures::reports(total), 10, 50),
    )
}

fn reports(mock: &MockTransport) -> PaginatedIdList<ReportInfo> {
    mock.service().report_info()
}

#[test]
fn test_second_page_covers_its_absolute_range() -> Result<()> {
    let mock = report_server(100);
    let mut list = reports(&mock);

    list.load_page(1, 10)?;

    assert_eq!(list.get(15)?.name, "Report 15");
    assert!(matches!(
        list.get(25),
        Err(Error::IndexOutOfBounds { index: 25, .. })
    ));
    assert!(list.get(5).is_err());

    let request = mock.last_request().expect("one request");
    assert_query_param(&request, "offset", "10")?;
    assert_query_param(&request, "size", "10")?;
    Ok(())
}

#[test]
fn test_load_next_stops_after_short_page() -> Result<()> {
    let mock = report_server(8);
    let mut list = reports(&mock);

    list.load_page(0, 5)?;
    assert_eq!(list.size(), 5);
    assert!(list.has_next_page());

    list.load_next()?;
    assert_eq!(list.size(), 8);
    assert_eq!(list.last_loaded_page(), Some(1));
    assert!(!list.has_next_page());
    assert_eq!(mock.request_count("api/reports"), 2);
    Ok(())
}

#[test]
fn test_iterate_whole_collection() -> Result<()> {
    let mock = report_server(23);
    let mut list = reports(&mock);

    list.load_with_size(5)?;
    while list.has_next_page() {
        list.load_next()?;
    }

    assert_eq!(list.size(), 23);
    assert_eq!(list.first_loaded_index(), Some(0));
    assert_eq!(list.last_loaded_index(), Some(22));
    let ids: Vec<&str> = list.iter().map(|report| report.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"0"));
    assert_eq!(ids.last(), Some(&"22"));
    assert_eq!(mock.request_count("api/reports"), 5);
    Ok(())
}

#[test]
fn test_default_load_uses_server_page_size() -> Result<()> {
    let mock = report_server(25);
    let mut list = reports(&mock);

    list.load()?;

    assert_unpaged(&mock.last_request().expect("one request"))?;
    assert_eq!(list.page_size(), Some(10));
    assert_eq!(list.size(), 10);

    list.load_next()?;
    let request = mock.last_request().expect("two requests");
    assert_query_param(&request, "offset", "10")?;
    assert_query_param(&request, "size", "10")?;
    Ok(())
}

#[test]
fn test_server_cap_fixes_window_page_size() -> Result<()> {
    let mock = report_server(200);
    let mut list = reports(&mock);

    list.load_with_size(80)?;
    assert_eq!(list.page_size(), Some(50));
    assert!(list.has_next_page());

    list.load_next()?;
    assert_query_param(&mock.last_request().expect("request"), "offset", "50")?;
    assert_eq!(list.size(), 100);
    assert_eq!(list.get(99)?.id, "99");
    Ok(())
}

#[test]
fn test_reload_resets_extended_window() -> Result<()> {
    let mock = report_server(60);
    let mut list = reports(&mock);

    list.load_page(0, 10)?.load_next()?.load_next()?;
    assert_eq!(list.size(), 30);

    list.load_page(4, 10)?;
    assert_eq!(list.first_loaded_page(), Some(4));
    assert_eq!(list.size(), 10);
    assert!(!list.contains_id("15"));
    assert_eq!(list.index_of_id("45"), Some(45));
    Ok(())
}

#[test]
fn test_comments_are_paged_per_report() -> Result<()> {
    init_tracing();
    let comments = (0..3)
        .map(|i| fixtures::comment(i, &format!("comment {i}")))
        .collect();
    let mock = MockTransport::new().route(
        "api/reports/7/comments",
        fixtures::paged_collection("comments", comments, 10, 10),
    );

    let mut list = mock.service().report_comments("7");
    list.load()?;

    assert_eq!(list.size(), 3);
    assert_eq!(list.get(2)?.text, "comment 2");
    assert!(!list.has_next_page());
    Ok(())
}
