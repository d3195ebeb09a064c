//! View Loading Tests
//!
//! Verifies the wire format of view requests built from filters and
//! intervals.

use anyhow::Result;
use chrono::NaiveDate;
use reportkit_sdk::types::{
    Attribute, AttributeType, AttributeValue, DateUnit, Filter, FilterOperation, Interval,
    TimeUnit,
};
use reportkit_sdk::{Config, Service, ViewType};
use reportkit_testing::assertions::filter_param;
use reportkit_testing::{MockTransport, init_tracing};
use serde_json::json;

fn view_server() -> MockTransport {
    init_tracing();
    MockTransport::new()
        .respond_json("api/reports/views/v1/chart", json!({"series": [1, 2, 3]}))
        .respond_json("api/reports/views/v1/table/bounds", json!({"rows": 4}))
}

fn region() -> Attribute {
    Attribute {
        id: Some("a1".to_string()),
        name: "Region".to_string(),
        code: "region".to_string(),
        attribute_type: AttributeType::Text,
        data_set_id: Some("ds-1".to_string()),
    }
}

#[test]
fn test_region_filter_wire_format() -> Result<()> {
    let mock = view_server();
    let filter = FilterOperation::IN.create_filter(region());
    let Filter::MultiValue(mut filter) = filter else {
        anyhow::bail!("IN must create a multi-value filter");
    };
    filter.add_all([AttributeValue::new("US", "us"), AttributeValue::new("EU", "eu")]);

    let content = mock
        .service()
        .load_view_content("v1", ViewType::Chart, [Filter::from(filter)])?;
    assert_eq!(content["series"], json!([1, 2, 3]));

    let request = mock.last_request().expect("one request");
    let param = filter_param(&request)?;
    let values = param["drilldown"][0]["region"]["values"]
        .as_array()
        .expect("values array");
    assert_eq!(values.len(), 2);
    assert!(values.contains(&json!("eu")));
    assert!(values.contains(&json!("us")));
    assert_eq!(param["drilldown"][0]["region"]["op"], json!("IN"));
    Ok(())
}

#[test]
fn test_month_interval_and_locale() -> Result<()> {
    let mock = view_server();
    let service = Service::with_config(
        mock.clone(),
        Config {
            locale: Some("de-AT".to_string()),
            ..Config::default()
        },
    );

    let start = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date");
    service
        .setup_view_loader("v1", ViewType::Table)
        .set_date_interval(Interval::absolute(DateUnit::Month, start, end)?)
        .load_content()?;

    let request = mock.last_request().expect("one request");
    assert_eq!(request.path, "api/reports/views/v1/table/bounds");
    assert_eq!(request.query_param("lang"), Some("de"));
    insta::assert_json_snapshot!(filter_param(&request)?, @r#"
    {
      "dateTimeDefinition": {
        "dateInterval": {
          "aggregationType": "MONTH",
          "interval": {
            "from": {
              "month": 1,
              "year": 2024
            },
            "to": {
              "month": 3,
              "year": 2024
            },
            "type": "absolute"
          }
        }
      }
    }
    "#);
    Ok(())
}

#[test]
fn test_filter_by_code_needs_no_attribute_lookup() -> Result<()> {
    let mock = view_server();
    let service = mock.service();

    let filter = service.create_filter_by_code(FilterOperation::NULL, "ds-1", "L_CITY");
    let mut loader = service.setup_view_loader("v1", ViewType::Chart);
    loader
        .add_filter(filter)
        .set_time_interval(Interval::custom(TimeUnit::Minute, "now-30", "now")?);
    loader.load_content()?;

    assert_eq!(mock.requests().len(), 1);
    let param = filter_param(&mock.last_request().expect("one request"))?;
    assert_eq!(param["drilldown"], json!([{"L_CITY": {"op": "NULL"}}]));
    assert_eq!(
        param["dateTimeDefinition"]["timeInterval"],
        json!({
            "aggregationType": "MINUTE",
            "interval": {"from": "now-30", "to": "now", "type": "custom"}
        })
    );
    Ok(())
}

#[test]
fn test_reloading_reissues_same_request() -> Result<()> {
    let mock = view_server();
    let service = mock.service();
    let mut loader = service.setup_view_loader("v1", ViewType::Chart);
    loader.set_date_interval(Interval::relative(DateUnit::Week, -2, 0)?);

    loader.load_content()?;
    loader.load_content()?;

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    Ok(())
}
