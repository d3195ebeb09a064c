//! Caching Tests
//!
//! Verifies snapshot replacement and fetch counts of cached lists.

use anyhow::Result;
use reportkit_testing::{MockTransport, fixtures, init_tracing};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_load_first_time_fetches_once() -> Result<()> {
    init_tracing();
    let mock = MockTransport::new().route(
        "api/domains",
        fixtures::whole_collection(
            "domains",
            vec![fixtures::domain("1", "Sales"), fixtures::domain("2", "Ops")],
        ),
    );
    let mut domains = mock.service().domain_info();

    assert!(domains.get().is_empty());
    assert_eq!(mock.request_count("api/domains"), 0);

    domains.load_first_time()?;
    let snapshot = domains.load_first_time()?;

    assert_eq!(snapshot.len(), 2);
    assert_eq!(mock.request_count("api/domains"), 1);
    Ok(())
}

#[test]
fn test_repeated_load_replaces_snapshot() -> Result<()> {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mock = MockTransport::new().route("api/domains/d1/userGroups", move |_| {
        let groups = if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            json!([fixtures::user_group("g1", "Admins"), fixtures::user_group("g2", "Viewers")])
        } else {
            json!([fixtures::user_group("g3", "Editors")])
        };
        reportkit_sdk::Response::json(&json!({ "userGroups": groups }))
    });
    let mut groups = mock.service().domain_user_groups("d1");

    let first = groups.load()?;
    let second = groups.load()?;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert_eq!(groups.to_list()[0].name, "Editors");
    Ok(())
}

#[test]
fn test_domain_users_filtered_by_group() -> Result<()> {
    init_tracing();
    let mock = MockTransport::new().route(
        "api/domains/d1/users",
        fixtures::whole_collection("users", vec![fixtures::user("u1", "jdoe")]),
    );

    let mut users = mock.service().domain_users("d1", Some("g2"));
    users.load()?;

    let request = mock.last_request().expect("one request");
    assert_eq!(request.query_param("userGroup_id"), Some("g2"));
    assert_eq!(users.get()[0].display_name(), "Jane Doe");

    let mut everyone = mock.service().domain_users("d1", None);
    everyone.load()?;
    assert_eq!(mock.last_request().expect("request").query_param("userGroup_id"), None);
    Ok(())
}

#[test]
fn test_attribute_values_keep_labels() -> Result<()> {
    init_tracing();
    let mock = MockTransport::new().route(
        "api/dataSets/ds-1/attributes/L_REGION/values",
        fixtures::whole_collection(
            "values",
            vec![
                fixtures::attribute_value("Europe", "eu"),
                fixtures::attribute_value("United States", "us"),
            ],
        ),
    );

    let mut values = mock.service().attribute_values("ds-1", "L_REGION");
    let snapshot = values.load()?;

    assert_eq!(snapshot[0].label, "Europe");
    assert_eq!(snapshot[1].value, "us");
    Ok(())
}
