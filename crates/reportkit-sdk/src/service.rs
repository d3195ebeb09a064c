use std::fmt;
use std::sync::Arc;

use reportkit_types::{
    Attribute, AttributeValue, Comment, DashboardInfo, DataSetInfo, DomainInfo, Filter,
    FilterAttribute, FilterOperation, ReportInfo, UnresolvedAttribute, UserGroup, UserInfo,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::CachedList;
use crate::config::Config;
use crate::paging::{PaginatedIdList, PaginatedList};
use crate::source::ListSource;
use crate::transport::{Request, Response, Transport};
use crate::view::{ViewLoader, ViewType};
use crate::{Error, Result};

/// Entry point to the server.
///
/// Cloning is cheap; every list, cache and loader created from a service
/// keeps its own clone.
#[derive(Clone)]
pub struct Service {
    transport: Arc<dyn Transport>,
    config: Arc<Config>,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Service with default configuration.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, Config::default())
    }

    pub fn with_config(transport: impl Transport + 'static, config: Config) -> Self {
        Self::from_shared(Arc::new(transport), config)
    }

    pub fn from_shared(transport: Arc<dyn Transport>, config: Config) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- raw requests ---

    /// GET `path` (relative to the API prefix) and parse the body as JSON.
    pub fn get_json(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
        let request = Request::get(self.config.resource_path(path)).with_query(query);
        let response = self.execute(&request)?;
        serde_json::from_slice(&response.body).map_err(|e| Error::InvalidJson(e.to_string()))
    }

    /// POST `form` to `path` (relative to the API prefix). The response body
    /// is returned as-is.
    pub fn post_form(&self, path: &str, form: Vec<(String, String)>) -> Result<Vec<u8>> {
        let request = Request::post(self.config.resource_path(path)).with_form(form);
        Ok(self.execute(&request)?.body)
    }

    fn execute(&self, request: &Request) -> Result<Response> {
        debug!(
            method = %request.method,
            path = %request.path,
            params = request.query.len() + request.form.len(),
            "issuing request"
        );
        let response = self
            .transport
            .execute(request)
            .map_err(Error::Connection)?;
        check_status(request, response)
    }

    fn get_element<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.get_json(path, Vec::new())?;
        serde_json::from_value(body).map_err(|e| Error::InvalidJson(e.to_string()))
    }

    // --- paginated lists ---

    pub fn dashboard_info(&self) -> PaginatedIdList<DashboardInfo> {
        PaginatedList::new(self.clone(), ListSource::new("dashboards", "dashboards"))
    }

    pub fn report_info(&self) -> PaginatedIdList<ReportInfo> {
        PaginatedList::new(self.clone(), ListSource::new("reports", "reports"))
    }

    pub fn report_comments(&self, report_id: &str) -> PaginatedList<Comment> {
        PaginatedList::new(
            self.clone(),
            ListSource::new(format!("reports/{report_id}/comments"), "comments"),
        )
    }

    pub fn data_set_info(&self) -> PaginatedIdList<DataSetInfo> {
        PaginatedList::new(self.clone(), ListSource::new("dataSets", "dataSets"))
    }

    // --- cached lists ---

    pub fn attribute_values(&self, data_set_id: &str, code: &str) -> CachedList<AttributeValue> {
        CachedList::new(
            self.clone(),
            ListSource::new(
                format!("dataSets/{data_set_id}/attributes/{code}/values"),
                "values",
            ),
        )
    }

    /// Values of the attribute a filter is scoped to.
    pub fn attribute_values_of(
        &self,
        attribute: &FilterAttribute,
    ) -> Result<CachedList<AttributeValue>> {
        let data_set_id = attribute.data_set_id().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "attribute '{}' is not bound to a data set",
                attribute.code()
            ))
        })?;
        Ok(self.attribute_values(data_set_id, attribute.code()))
    }

    pub fn domain_info(&self) -> CachedList<DomainInfo> {
        CachedList::new(self.clone(), ListSource::new("domains", "domains"))
    }

    /// Users of a domain, optionally restricted to one user group.
    pub fn domain_users(&self, domain_id: &str, user_group_id: Option<&str>) -> CachedList<UserInfo> {
        let mut source = ListSource::new(format!("domains/{domain_id}/users"), "users");
        if let Some(group) = user_group_id {
            source = source.with_param("userGroup_id", group);
        }
        CachedList::new(self.clone(), source)
    }

    pub fn domain_user_groups(&self, domain_id: &str) -> CachedList<UserGroup> {
        CachedList::new(
            self.clone(),
            ListSource::new(format!("domains/{domain_id}/userGroups"), "userGroups"),
        )
    }

    // --- single elements ---

    pub fn load_report(&self, id: &str) -> Result<ReportInfo> {
        self.get_element(&format!("reports/{id}"))
    }

    pub fn load_dashboard(&self, id: &str) -> Result<DashboardInfo> {
        self.get_element(&format!("dashboards/{id}"))
    }

    pub fn load_user(&self, id: &str) -> Result<UserInfo> {
        self.get_element(&format!("users/{id}"))
    }

    /// Attributes of a data set, each bound to that data set.
    pub fn load_data_set_attributes(&self, data_set_id: &str) -> Result<Vec<Attribute>> {
        let body = self.get_json(&format!("dataSets/{data_set_id}"), Vec::new())?;
        let node = body
            .get("attributes")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        let mut attributes: Vec<Attribute> =
            serde_json::from_value(node).map_err(|e| Error::InvalidJson(e.to_string()))?;
        for attribute in &mut attributes {
            attribute.data_set_id = Some(data_set_id.to_string());
        }
        Ok(attributes)
    }

    pub fn post_comment(&self, report_id: &str, text: &str) -> Result<()> {
        self.post_form(
            &format!("reports/{report_id}/comments"),
            vec![("text".to_string(), text.to_string())],
        )?;
        Ok(())
    }

    // --- views and filters ---

    pub fn setup_view_loader(&self, view_id: &str, view_type: ViewType) -> ViewLoader {
        ViewLoader::new(self.clone(), view_id, view_type)
    }

    /// Loads a view with only filters applied.
    pub fn load_view_content<I>(&self, view_id: &str, view_type: ViewType, filters: I) -> Result<Value>
    where
        I: IntoIterator<Item = Filter>,
    {
        self.setup_view_loader(view_id, view_type)
            .add_filters(filters)
            .load_content()
    }

    /// Filter on an attribute known only by its code, without loading the
    /// attribute first.
    pub fn create_filter_by_code(
        &self,
        operation: FilterOperation,
        data_set_id: &str,
        code: &str,
    ) -> Filter {
        operation.create_filter(UnresolvedAttribute::new(data_set_id, code))
    }
}

fn check_status(request: &Request, response: Response) -> Result<Response> {
    if response.is_success() {
        return Ok(response);
    }

    let status = response.status;
    let uri = request.path.clone();
    warn!(status, method = %request.method, path = %uri, "server rejected request");

    Err(match status {
        404 => Error::NotFound { uri },
        405 => Error::MethodNotAllowed { uri },
        401 | 403 => Error::Authorization {
            status,
            body: response.text(),
        },
        500 => Error::InternalError,
        _ => Error::UnexpectedResponse {
            status,
            body: response.text(),
        },
    })
}
