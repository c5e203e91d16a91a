//! Per-request timing log.

use std::time::Instant;

use tracing::info;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;

/// Logs one line per request: method, target (path + query), and elapsed
/// wall-clock seconds to two decimals.
///
/// This is the only place request timing is recorded — handlers log what
/// they did to the store, never how long the request took. The stage runs
/// on success and failure alike and returns the downstream response
/// untouched.
pub struct Trace;

impl Middleware for Trace {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        // Grab what the log line needs before ownership moves downstream.
        let method = req.method().clone();
        let target = req.target().to_owned();
        Box::pin(async move {
            let start = Instant::now();
            let response = next.run(req).await;
            let seconds = start.elapsed().as_secs_f64();
            info!("completed {method} {target} in {seconds:.2}s");
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Stack;
    use crate::response::Response;
    use crate::router::Router;
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn request(method: Method, target: &str) -> Request {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(target)
            .body(())
            .unwrap()
            .into_parts();
        Request::new(parts, Bytes::new())
    }

    async fn teapot(_req: Request) -> Response {
        Response::builder().status(StatusCode::IM_A_TEAPOT).text("short and stout")
    }

    #[tokio::test]
    async fn response_passes_through_unchanged() {
        let stack = Stack::new(Router::new().get("/teapot", teapot)).layer(Trace);
        let response = stack.handle(request(Method::GET, "/teapot?q=1")).await;
        assert_eq!(response.status_code(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.body(), b"short and stout");
    }

    #[tokio::test]
    async fn failures_still_pass_through() {
        let stack = Stack::new(Router::new()).layer(Trace);
        let response = stack.handle(request(Method::GET, "/missing")).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    /// Shared buffer the fmt subscriber writes into, so tests can read the
    /// emitted lines back.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    // Relies on the single-threaded test runtime: `set_default` scopes the
    // subscriber to this thread, which is where the stage logs.
    #[tokio::test]
    async fn log_line_has_method_target_and_two_decimal_seconds() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let stack = Stack::new(Router::new().get("/teapot", teapot)).layer(Trace);
        stack.handle(request(Method::GET, "/teapot?q=1")).await;

        let output = capture.contents();
        assert!(
            output.contains("completed GET /teapot?q=1 in"),
            "unexpected log output: {output}"
        );

        // Elapsed renders as seconds with exactly two decimals.
        let seconds = output
            .split(" in ")
            .nth(1)
            .and_then(|tail| tail.split('s').next())
            .unwrap();
        let (whole, frac) = seconds.split_once('.').unwrap();
        assert!(whole.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(frac.len(), 2);
        assert!(frac.chars().all(|c| c.is_ascii_digit()));
    }
}
