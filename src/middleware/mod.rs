//! Middleware pipeline.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: per-request timing, CORS decoration, request-id
//! injection. A [`Stack`] is an ordered list of stages composed once at
//! startup; each stage receives the request and an explicit [`Next`]
//! continuation. The innermost stage — supplied by the stack itself — is
//! router dispatch, answering `404` when nothing matches.
//!
//! Stages must propagate whatever `next` produces. Decorating the response
//! on the way out is fine; swallowing or replacing a downstream result is
//! not (short-circuiting *before* calling `next`, as CORS preflight does,
//! is a stage answering for itself — that is allowed).

mod cors;
mod trace;

pub use cors::Cors;
pub use trace::Trace;

use std::sync::Arc;

use http::StatusCode;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// A single pipeline stage.
///
/// `handle` receives ownership of the request and the continuation for the
/// rest of the pipeline. Call `next.run(req)` exactly once to proceed, or
/// build a response directly to short-circuit.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

/// The rest of the pipeline, handed to each stage as an explicit value.
pub struct Next {
    stages: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    router: Arc<Router>,
}

impl Next {
    /// Runs the remaining stages, ending in router dispatch.
    pub fn run(mut self, req: Request) -> BoxFuture {
        match self.stages.get(self.index) {
            Some(stage) => {
                let stage = Arc::clone(stage);
                self.index += 1;
                stage.handle(req, self)
            }
            None => {
                let router = Arc::clone(&self.router);
                Box::pin(async move { dispatch(&router, req).await })
            }
        }
    }
}

async fn dispatch(router: &Router, mut req: Request) -> Response {
    match router.lookup(req.method(), req.path()) {
        Some((handler, params)) => {
            req.set_params(params);
            handler.call(req).await
        }
        None => Response::status(StatusCode::NOT_FOUND),
    }
}

/// The composed pipeline: stages in registration order, outermost first,
/// with the router as the terminal stage.
pub struct Stack {
    stages: Arc<[Arc<dyn Middleware>]>,
    router: Arc<Router>,
}

impl Stack {
    /// A stack with no stages — requests go straight to the router.
    pub fn new(router: Router) -> Self {
        Self { stages: Vec::new().into(), router: Arc::new(router) }
    }

    /// Appends a stage. The first `layer` call registers the outermost
    /// stage. Startup-only: rebuilds the stage list.
    pub fn layer(self, stage: impl Middleware) -> Self {
        let mut stages: Vec<Arc<dyn Middleware>> = self.stages.to_vec();
        stages.push(Arc::new(stage));
        Self { stages: stages.into(), router: self.router }
    }

    /// Runs one request through every stage and the router.
    pub async fn handle(&self, req: Request) -> Response {
        let next = Next {
            stages: Arc::clone(&self.stages),
            index: 0,
            router: Arc::clone(&self.router),
        };
        next.run(req).await
    }
}
