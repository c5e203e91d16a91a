//! # rosterd
//!
//! A small HTTP service that keeps a roster of users in memory.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Two endpoints, one resource:
//!
//! - `POST /users/` — validate a JSON payload, assign a random UUID, append
//!   the record to the in-process store, answer `201` with the full record.
//! - `GET /users/` — answer `200` with every stored record, insertion order.
//!
//! The store lives exactly as long as the process. There is no persistence,
//! no auth, no pagination — a reverse proxy (or nobody) owns everything else.
//!
//! ## How a request flows
//!
//! ```text
//! hyper connection task
//!        ↓ body collected into Bytes
//! middleware::Stack            ← trace (timing log), cors (boundary policy)
//!        ↓ Next::run
//! Router lookup                ← matchit radix tree, one per method
//!        ↓
//! handler (create_user / list_users)
//!        ↓
//! UserStore                    ← mutex-guarded Vec<User>
//! ```
//!
//! Every stage hands the request to an explicit `next`; no stage may swallow
//! a downstream response or error.

mod config;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod store;
mod users;

pub mod middleware;

pub use config::Config;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use store::UserStore;
pub use users::{NewUser, User, create_user, list_users};
