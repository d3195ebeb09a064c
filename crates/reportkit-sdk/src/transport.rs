//! The HTTP collaborator the SDK talks through.
//!
//! Connection handling, TLS, authentication and encoding of query and form
//! pairs all belong to the [`Transport`] implementation. The SDK only builds
//! [`Request`]s and interprets [`Response`]s.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to the server. Pairs keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = form;
        self
    }

    /// First query value for `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First form value for `name`.
    pub fn form_param(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self::ok(value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Synchronous request/response channel to the server.
///
/// A failure here means the request never produced a response (refused
/// connection, timeout, TLS error). Non-2xx statuses are not failures at
/// this level; return them as a [`Response`].
pub trait Transport: Send + Sync {
    fn execute(&self, request: &Request) -> anyhow::Result<Response>;
}

impl<F> Transport for F
where
    F: Fn(&Request) -> anyhow::Result<Response> + Send + Sync,
{
    fn execute(&self, request: &Request) -> anyhow::Result<Response> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = Request::post("api/reports/1/comments")
            .with_form(vec![("text".to_string(), "hello".to_string())]);
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.form_param("text"), Some("hello"));
        assert_eq!(request.query_param("text"), None);
        assert_eq!(request.method.to_string(), "POST");
    }

    #[test]
    fn test_response_success_range() {
        assert!(Response::ok("{}").is_success());
        assert!(Response::new(204, "").is_success());
        assert!(!Response::new(301, "").is_success());
        assert!(!Response::new(404, "missing").is_success());
        assert_eq!(Response::new(404, "missing").text(), "missing");
    }

    #[test]
    fn test_closure_is_a_transport() -> anyhow::Result<()> {
        let transport = |request: &Request| -> anyhow::Result<Response> {
            Ok(Response::ok(request.path.clone()))
        };
        let response = transport.execute(&Request::get("api/domains"))?;
        assert_eq!(response.text(), "api/domains");
        Ok(())
    }
}
