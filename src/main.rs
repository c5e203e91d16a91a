//! rosterd binary: wire the store, routes, and middleware, then serve.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl -X POST http://localhost:8000/users/ \
//!        -H 'content-type: application/json' \
//!        -d '{"first_name":"Ada","last_name":"Lovelace","age":36,"email":"ada@example.com","height":1.65}'
//!   curl http://localhost:8000/users/

use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;

use rosterd::middleware::{Cors, Stack, Trace};
use rosterd::{Config, Router, Server, UserStore, create_user, list_users};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let store = Arc::new(UserStore::new());

    let router = Router::new()
        .post("/users/", {
            let store = Arc::clone(&store);
            move |req| create_user(req, Arc::clone(&store))
        })
        .get("/users/", {
            let store = Arc::clone(&store);
            move |req| list_users(req, Arc::clone(&store))
        });

    // Trace is outermost so the timing line covers the whole pipeline,
    // preflight answers included.
    let stack = Stack::new(router)
        .layer(Trace)
        .layer(Cors::new(config.allowed_origins.clone()));

    if let Err(e) = Server::bind(&config.addr).serve(stack).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
