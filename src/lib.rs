//! # roster
//!
//! A small user-management HTTP service for deployment behind a reverse
//! proxy, and the minimal HTTP layer it runs on.
//!
//! ## The contract
//!
//! nginx handles TLS, HTTPS redirects, rate limiting, slow clients, and
//! body-size limits. roster does not. What is left:
//!
//! - Radix-tree routing via [`matchit`], one tree per [`Method`]
//! - An ordered [`middleware`] pipeline: [`recover`](middleware::recover),
//!   [`bearer`](middleware::bearer), [`trace`](middleware::trace)
//! - CRUD over an in-memory, mutex-guarded [`UserStore`](users::UserStore)
//! - Async I/O on tokio + hyper, graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Routes
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/users` | 200 + every user |
//! | GET | `/api/users/{id}` | 200 + user |
//! | POST | `/api/users` | 201 + user, `location` |
//! | PUT | `/api/users/{id}` | 204 |
//! | DELETE | `/api/users/{id}` | 204 |
//!
//! Every request needs `Authorization: Bearer <compact JWT>`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use roster::config::Environment;
//! use roster::users::UserStore;
//! use roster::{Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roster::Error> {
//!     let router = app::build(Arc::new(UserStore::seeded()), Environment::Production);
//!     Server::bind(([0, 0, 0, 0], 3000).into()).serve(router).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod pipeline;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod middleware;
pub mod telemetry;
pub mod users;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use pipeline::{Next, Pipeline};
pub use request::Request;
pub use response::{IntoOutcome, IntoResponse, Outcome, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
