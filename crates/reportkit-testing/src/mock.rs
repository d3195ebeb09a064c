//! Scripted transport for driving the SDK in tests.

use reportkit_sdk::{Method, Request, Response, Service, Transport};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

enum Outcome {
    Respond(Response),
    Disconnect(String),
}

#[derive(Default)]
struct State {
    routes: Vec<(Option<Method>, String, Handler)>,
    one_shots: VecDeque<(String, Outcome)>,
    requests: Vec<Request>,
}

/// In-memory transport. Routes match on the exact request path; anything
/// unmatched answers 404. One-shot outcomes queued with
/// [`fail_next`](Self::fail_next) or [`disconnect_next`](Self::disconnect_next)
/// take precedence over routes and are consumed in order.
///
/// Clones share state, so a test can keep one clone for inspection and hand
/// another to a [`Service`].
///
/// # Example
/// ```
/// use reportkit_testing::MockTransport;
/// use serde_json::json;
///
/// let mock = MockTransport::new()
///     .respond_json("api/domains", json!({"domains": [{"id": "1", "name": "Sales"}]}));
/// let mut domains = mock.service().domain_info();
/// assert_eq!(domains.load().unwrap().len(), 1);
/// assert_eq!(mock.request_count("api/domains"), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `path` with `handler` for any method.
    pub fn route<F>(self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.state().routes.push((None, path.into(), handler));
        self
    }

    /// Serve `path` with `handler` for one method only.
    pub fn route_method<F>(self, method: Method, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.state().routes.push((Some(method), path.into(), handler));
        self
    }

    /// Serve `path` with the same JSON body every time.
    pub fn respond_json(self, path: impl Into<String>, body: Value) -> Self {
        self.route(path, move |_| Response::json(&body))
    }

    /// The next request to `path` gets `status` instead of its route.
    pub fn fail_next(&self, path: impl Into<String>, status: u16) -> &Self {
        let response = Response::new(status, format!("scripted failure {status}"));
        self.state()
            .one_shots
            .push_back((path.into(), Outcome::Respond(response)));
        self
    }

    /// The next request to `path` fails at the transport level.
    pub fn disconnect_next(&self, path: impl Into<String>) -> &Self {
        self.state().one_shots.push_back((
            path.into(),
            Outcome::Disconnect("connection reset by peer".to_string()),
        ));
        self
    }

    /// A service using a clone of this transport and default configuration.
    pub fn service(&self) -> Service {
        Service::new(self.clone())
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.state().requests.last().cloned()
    }

    /// Number of requests seen for `path`.
    pub fn request_count(&self, path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|request| request.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &Request) -> anyhow::Result<Response> {
        let mut state = self.state();
        state.requests.push(request.clone());

        if let Some(position) = state
            .one_shots
            .iter()
            .position(|(path, _)| *path == request.path)
            && let Some((_, outcome)) = state.one_shots.remove(position)
        {
            return match outcome {
                Outcome::Respond(response) => Ok(response),
                Outcome::Disconnect(reason) => Err(anyhow::anyhow!(reason)),
            };
        }

        let handler = state
            .routes
            .iter()
            .rev()
            .find(|(method, path, _)| {
                *path == request.path && method.is_none_or(|m| m == request.method)
            })
            .map(|(_, _, handler)| Arc::clone(handler));
        drop(state);

        Ok(match handler {
            Some(handler) => handler(request),
            None => Response::new(404, format!("no route for {}", request.path)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unrouted_path_is_not_found() -> anyhow::Result<()> {
        let mock = MockTransport::new();
        let response = mock.execute(&Request::get("api/nowhere"))?;
        assert_eq!(response.status, 404);
        assert_eq!(mock.request_count("api/nowhere"), 1);
        Ok(())
    }

    #[test]
    fn test_one_shots_take_precedence_once() -> anyhow::Result<()> {
        let mock = MockTransport::new().respond_json("api/domains", json!({"domains": []}));
        mock.fail_next("api/domains", 500).disconnect_next("api/domains");

        assert_eq!(mock.execute(&Request::get("api/domains"))?.status, 500);
        assert!(mock.execute(&Request::get("api/domains")).is_err());
        assert_eq!(mock.execute(&Request::get("api/domains"))?.status, 200);
        assert_eq!(mock.requests().len(), 3);
        Ok(())
    }

    #[test]
    fn test_later_routes_win_and_methods_filter() -> anyhow::Result<()> {
        let mock = MockTransport::new()
            .respond_json("api/x", json!(1))
            .respond_json("api/x", json!(2))
            .route_method(Method::Post, "api/x", |_| Response::new(201, ""));

        assert_eq!(mock.execute(&Request::get("api/x"))?.text(), "2");
        assert_eq!(mock.execute(&Request::post("api/x"))?.status, 201);
        Ok(())
    }
}
