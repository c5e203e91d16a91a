//! Cross-origin resource sharing at the service boundary.

use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, VARY,
};
use http::{Method, StatusCode};

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// Allowed methods advertised on preflight. The service itself only routes
/// GET and POST; the policy is permissive by configuration, not by routing.
const ALLOW_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";

/// Permissive CORS for a fixed allow-list of origins: all methods, all
/// headers, credentials allowed.
///
/// Requests from an allowed origin get `access-control-allow-*` headers
/// stamped onto whatever the pipeline produced. Preflight (`OPTIONS` with
/// `access-control-request-method`) from an allowed origin is answered here
/// with `204` and never reaches the router. Requests from other origins
/// pass through untouched — the browser enforces the rest.
pub struct Cors {
    origins: Vec<String>,
}

impl Cors {
    pub fn new(origins: impl IntoIterator<Item = String>) -> Self {
        Self { origins: origins.into_iter().collect() }
    }

    fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }
}

impl Middleware for Cors {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        // Only a syntactically valid, allow-listed origin earns headers.
        let origin = req
            .header("origin")
            .filter(|o| self.allows(o))
            .and_then(|o| HeaderValue::from_str(o).ok());

        let is_preflight = req.method() == Method::OPTIONS
            && req.header("access-control-request-method").is_some();

        if is_preflight {
            if let Some(origin) = origin.clone() {
                // Allow-headers reflects the request, matching a policy of
                // "all headers" even with credentials in play.
                let allow_headers = req
                    .header("access-control-request-headers")
                    .and_then(|h| HeaderValue::from_str(h).ok())
                    .unwrap_or_else(|| HeaderValue::from_static("*"));
                return Box::pin(async move {
                    let mut response =
                        Response::builder().status(StatusCode::NO_CONTENT).no_body();
                    decorate(&mut response, origin);
                    response.insert_header(
                        ACCESS_CONTROL_ALLOW_METHODS,
                        HeaderValue::from_static(ALLOW_METHODS),
                    );
                    response.insert_header(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
                    response
                });
            }
        }

        Box::pin(async move {
            let mut response = next.run(req).await;
            if let Some(origin) = origin {
                decorate(&mut response, origin);
            }
            response
        })
    }
}

fn decorate(response: &mut Response, origin: HeaderValue) {
    response.insert_header(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    response.insert_header(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    // Caches must key on the origin since the allow-origin echo varies.
    response.insert_header(VARY, HeaderValue::from_static("origin"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Stack;
    use crate::router::Router;
    use bytes::Bytes;

    const ORIGIN: &str = "http://localhost:8000";

    fn stack() -> Stack {
        Stack::new(Router::new().get("/users/", list)).layer(Cors::new([ORIGIN.to_owned()]))
    }

    async fn list(_req: Request) -> Response {
        Response::json(b"[]".to_vec())
    }

    fn request(method: Method, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().method(method).uri("/users/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        Request::new(parts, Bytes::new())
    }

    #[tokio::test]
    async fn allowed_origin_gets_headers() {
        let response = stack()
            .handle(request(Method::GET, &[("origin", ORIGIN)]))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("access-control-allow-origin"), Some(ORIGIN));
        assert_eq!(response.header("access-control-allow-credentials"), Some("true"));
    }

    #[tokio::test]
    async fn unknown_origin_passes_through_bare() {
        let response = stack()
            .handle(request(Method::GET, &[("origin", "http://evil.example")]))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("access-control-allow-origin"), None);
    }

    #[tokio::test]
    async fn same_origin_request_has_no_cors_headers() {
        let response = stack().handle(request(Method::GET, &[])).await;
        assert_eq!(response.header("access-control-allow-origin"), None);
    }

    #[tokio::test]
    async fn preflight_is_answered_before_routing() {
        let response = stack()
            .handle(request(
                Method::OPTIONS,
                &[
                    ("origin", ORIGIN),
                    ("access-control-request-method", "POST"),
                    ("access-control-request-headers", "content-type"),
                ],
            ))
            .await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(response.header("access-control-allow-origin"), Some(ORIGIN));
        assert_eq!(response.header("access-control-allow-headers"), Some("content-type"));
        assert!(response
            .header("access-control-allow-methods")
            .unwrap()
            .contains("POST"));
    }
}
