//! Loading view content with filters and intervals applied.

use std::fmt;

use reportkit_types::{DateUnit, Filter, IdElement, Interval, TimeUnit};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;
use crate::service::Service;

/// Kind of a report view, which decides the endpoint its content comes
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Chart,
    Kpi,
    Table,
    Text,
    Map,
    Image,
}

impl ViewType {
    /// Path segment(s) under `reports/views/{id}/`.
    pub fn uri(&self) -> &'static str {
        match self {
            ViewType::Chart => "chart",
            ViewType::Kpi => "kpi",
            ViewType::Table => "table/bounds",
            ViewType::Text => "text",
            ViewType::Map => "map",
            ViewType::Image => "image",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewType::Chart => write!(f, "chart"),
            ViewType::Kpi => write!(f, "kpi"),
            ViewType::Table => write!(f, "table"),
            ViewType::Text => write!(f, "text"),
            ViewType::Map => write!(f, "map"),
            ViewType::Image => write!(f, "image"),
        }
    }
}

/// Collects filters, intervals and a locale for one view request.
///
/// Setting an interval replaces the previous one on the same axis; filters
/// accumulate in call order. [`load_content`](Self::load_content) issues a
/// fresh request on every call.
#[derive(Debug, Clone)]
pub struct ViewLoader {
    service: Service,
    view_id: String,
    view_type: ViewType,
    date_interval: Option<Interval<DateUnit>>,
    time_interval: Option<Interval<TimeUnit>>,
    filters: Vec<Filter>,
    locale: Option<String>,
}

impl ViewLoader {
    /// A loader with no filters or intervals and the configured default
    /// locale.
    pub fn new(service: Service, view_id: impl Into<String>, view_type: ViewType) -> Self {
        let locale = service.config().locale.clone();
        Self {
            service,
            view_id: view_id.into(),
            view_type,
            date_interval: None,
            time_interval: None,
            filters: Vec::new(),
            locale,
        }
    }

    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn date_interval(&self) -> Option<&Interval<DateUnit>> {
        self.date_interval.as_ref()
    }

    pub fn time_interval(&self) -> Option<&Interval<TimeUnit>> {
        self.time_interval.as_ref()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn set_date_interval(&mut self, interval: Interval<DateUnit>) -> &mut Self {
        self.date_interval = Some(interval);
        self
    }

    pub fn set_time_interval(&mut self, interval: Interval<TimeUnit>) -> &mut Self {
        self.time_interval = Some(interval);
        self
    }

    pub fn add_filter(&mut self, filter: impl Into<Filter>) -> &mut Self {
        self.filters.push(filter.into());
        self
    }

    pub fn add_filters<I>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Filter>,
    {
        self.filters.extend(filters.into_iter().map(Into::into));
        self
    }

    /// Locale tag such as `de-AT`; only its language part is sent.
    pub fn set_locale(&mut self, locale: impl Into<String>) -> &mut Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn path(&self) -> String {
        format!("reports/views/{}/{}", self.view_id, self.view_type.uri())
    }

    /// Query parameters for the current state.
    pub fn request_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        let mut definition = Map::new();
        if let Some(interval) = &self.date_interval {
            merge_into(&mut definition, interval.to_json());
        }
        if let Some(interval) = &self.time_interval {
            merge_into(&mut definition, interval.to_json());
        }

        let mut filter = Map::new();
        if !self.filters.is_empty() {
            let drilldown = self.filters.iter().map(Filter::to_json).collect();
            filter.insert("drilldown".to_string(), Value::Array(drilldown));
        }
        if !definition.is_empty() {
            filter.insert("dateTimeDefinition".to_string(), Value::Object(definition));
        }
        if !filter.is_empty() {
            params.push(("filter".to_string(), Value::Object(filter).to_string()));
        }

        if let Some(lang) = self.locale.as_deref().and_then(language_of) {
            params.push(("lang".to_string(), lang));
        }

        params
    }

    /// Issues the load request with the current state.
    pub fn load_content(&self) -> Result<Value> {
        self.service.get_json(&self.path(), self.request_params())
    }
}

impl IdElement for ViewLoader {
    fn id(&self) -> &str {
        &self.view_id
    }
}

fn merge_into(target: &mut Map<String, Value>, node: Value) {
    if let Value::Object(entries) = node {
        target.extend(entries);
    }
}

fn language_of(locale: &str) -> Option<String> {
    let language = locale.split(['-', '_']).next()?.trim();
    (!language.is_empty()).then(|| language.to_ascii_lowercase())
}
