//! Where a list or cached collection gets its elements from.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::service::Service;
use crate::{Error, Result};

/// Endpoint plus the JSON field holding the element array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSource {
    path: String,
    field: String,
    query: Vec<(String, String)>,
}

impl ListSource {
    /// `path` is relative to the configured API prefix.
    pub fn new(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
            query: Vec::new(),
        }
    }

    /// Adds a query parameter sent with every fetch.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Fetches one batch. With `paging = Some((offset, size))` the offset and
    /// size are sent; otherwise the server picks its defaults.
    pub(crate) fn fetch<T: DeserializeOwned>(
        &self,
        service: &Service,
        paging: Option<(usize, usize)>,
    ) -> Result<Batch<T>> {
        let mut query = self.query.clone();
        if let Some((offset, size)) = paging {
            query.push(("offset".to_string(), offset.to_string()));
            query.push(("size".to_string(), size.to_string()));
        }
        let body = service.get_json(&self.path, query)?;
        Batch::parse(&body, &self.field)
    }
}

/// One response worth of elements plus the page size the server echoed.
#[derive(Debug)]
pub(crate) struct Batch<T> {
    pub items: Vec<T>,
    pub size: Option<usize>,
}

impl<T: DeserializeOwned> Batch<T> {
    pub(crate) fn parse(body: &Value, field: &str) -> Result<Self> {
        let array = match body {
            Value::Array(_) => body,
            Value::Object(map) => map
                .get(field)
                .ok_or_else(|| Error::InvalidJson(format!("missing field '{field}'")))?,
            other => {
                return Err(Error::InvalidJson(format!(
                    "expected an object with field '{field}', got {other}"
                )));
            }
        };

        let items = Vec::<T>::deserialize(array)
            .map_err(|e| Error::InvalidJson(format!("field '{field}': {e}")))?;

        Ok(Self {
            items,
            size: echoed(body, "size"),
        })
    }
}

fn echoed(body: &Value, name: &str) -> Option<usize> {
    let value = body.get(name)?;
    let number = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    usize::try_from(number).ok()
}
