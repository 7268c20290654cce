//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns. A middleware is any async function (or closure)
//! shaped like
//!
//! ```text
//! Fn(Request, Next) -> impl Future<Output = Outcome>
//! ```
//!
//! It either calls `next.run(req).await` to continue, or returns its own
//! response to short-circuit. Register with [`Router::layer`](crate::Router::layer);
//! the first layer registered is the outermost.
//!
//! Built-in middleware:
//! - [`recover`]: failure boundary, turns errors and panics into a `500`
//! - [`bearer`]: rejects requests without a well-formed bearer token
//! - [`trace`]: per-request log events with method, path, status, latency

pub mod auth;
pub mod recover;
pub mod trace;

pub use auth::bearer;
pub use recover::recover;
pub use trace::trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::BoxFuture;
use crate::pipeline::Next;
use crate::request::Request;
use crate::response::Outcome;

/// Internal dispatch interface, the middleware twin of
/// [`ErasedHandler`](crate::handler::ErasedHandler).
#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware. Sealed, like
/// [`Handler`](crate::Handler).
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

struct FnMiddleware<F>(F);

impl<F, Fut> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin((self.0)(req, next))
    }
}
