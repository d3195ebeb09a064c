//! Assertions on requests recorded by [`MockTransport`](crate::MockTransport).

use anyhow::{Context, Result};
use reportkit_sdk::Request;
use serde_json::Value;

/// Assert that `request` carries query parameter `name` with `expected`.
pub fn assert_query_param(request: &Request, name: &str, expected: &str) -> Result<()> {
    let actual = request
        .query_param(name)
        .with_context(|| format!("Request to {} has no '{}' parameter", request.path, name))?;

    if actual != expected {
        anyhow::bail!(
            "Parameter '{}' of {} is '{}' but expected '{}'",
            name,
            request.path,
            actual,
            expected
        );
    }

    Ok(())
}

/// Assert that `request` sends no paging parameters.
pub fn assert_unpaged(request: &Request) -> Result<()> {
    for name in ["offset", "size"] {
        if let Some(value) = request.query_param(name) {
            anyhow::bail!("Request to {} unexpectedly sends {}={}", request.path, name, value);
        }
    }
    Ok(())
}

/// Parse the JSON `filter` parameter of a view request.
pub fn filter_param(request: &Request) -> Result<Value> {
    let raw = request
        .query_param("filter")
        .with_context(|| format!("Request to {} has no 'filter' parameter", request.path))?;
    serde_json::from_str(raw).context("'filter' parameter is not valid JSON")
}
