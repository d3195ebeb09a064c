//! JSON builders for server responses.

use reportkit_sdk::{Request, Response};
use serde_json::{Value, json};

/// Handler for a server-paged collection.
///
/// Honors `offset` and `size` query parameters, falls back to
/// `default_size` when no size is sent and caps sizes at `max_size`. Echoes
/// the effective `offset` and `size` like the server does.
pub fn paged_collection(
    field: &'static str,
    elements: Vec<Value>,
    default_size: usize,
    max_size: usize,
) -> impl Fn(&Request) -> Response + Send + Sync + 'static {
    move |request: &Request| {
        let param = |name: &str| {
            request
                .query_param(name)
                .and_then(|value| value.parse::<usize>().ok())
        };
        let offset = param("offset").unwrap_or(0);
        let size = param("size").unwrap_or(default_size).min(max_size);
        let page: Vec<Value> = elements.iter().skip(offset).take(size).cloned().collect();
        Response::json(&json!({
            field: page,
            "offset": offset,
            "size": size,
        }))
    }
}

/// Handler for a collection returned whole.
pub fn whole_collection(
    field: &'static str,
    elements: Vec<Value>,
) -> impl Fn(&Request) -> Response + Send + Sync + 'static {
    move |_: &Request| Response::json(&json!({ field: elements }))
}

pub fn report(id: usize) -> Value {
    json!({
        "id": id.to_string(),
        "name": format!("Report {id}"),
        "description": format!("Description of report {id}"),
        "owner": "Jane Doe",
        "lastChange": "2024-03-02T10:15:00"
    })
}

pub fn reports(count: usize) -> Vec<Value> {
    (0..count).map(report).collect()
}

pub fn dashboard(id: usize) -> Value {
    json!({
        "id": id.to_string(),
        "name": format!("Dashboard {id}"),
        "lastChange": "2024-03-02T10:15:00"
    })
}

pub fn dashboards(count: usize) -> Vec<Value> {
    (0..count).map(dashboard).collect()
}

pub fn comment(id: usize, text: &str) -> Value {
    json!({
        "id": id,
        "authorId": "u1",
        "author": "Jane Doe",
        "text": text,
        "when": "2024-03-02T10:15:00"
    })
}

pub fn domain(id: &str, name: &str) -> Value {
    json!({"id": id, "name": name})
}

pub fn user_group(id: &str, name: &str) -> Value {
    json!({"id": id, "name": name})
}

pub fn user(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "firstName": "Jane",
        "lastName": "Doe",
        "email": format!("{username}@example.com")
    })
}

pub fn attribute_value(label: &str, value: &str) -> Value {
    json!({"label": label, "value": value})
}
