//! The frozen request pipeline: middleware layers around the router.
//!
//! ```text
//! Pipeline::call(req)
//!   └─ Next { index: 0 }.run(req)   → layers[0](req, next)
//!        └─ next.run(req)           → layers[1](req, next)
//!             └─ …                  → router.dispatch(req)
//! ```
//!
//! Each [`Next`] is a cheap handle (one `Arc` and an index), so a layer can
//! hold on to it across an `.await` and still be `Send + 'static`.

use std::sync::Arc;

use tracing::error;

use crate::handler::BoxFuture;
use crate::middleware::BoxedMiddleware;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

struct Chain {
    layers: Vec<BoxedMiddleware>,
    router: Router,
}

/// Router and middleware frozen behind an `Arc`, shared by every connection.
///
/// Cloning is one atomic increment. [`call`](Pipeline::call) is what the
/// server runs per request, and what tests run without a socket.
#[derive(Clone)]
pub struct Pipeline {
    chain: Arc<Chain>,
}

impl Pipeline {
    pub(crate) fn new(mut router: Router) -> Self {
        let layers = std::mem::take(&mut router.layers);
        Self { chain: Arc::new(Chain { layers, router }) }
    }

    /// Run one request through every layer and the router.
    ///
    /// An `Err` that escapes all layers still produces a response: a bare
    /// `500`. Register [`recover`](crate::middleware::recover) to control the
    /// body.
    pub async fn call(&self, req: Request) -> Response {
        let next = Next { chain: Arc::clone(&self.chain), index: 0 };
        match next.run(req).await {
            Ok(res) => res,
            Err(e) => {
                error!(error = %e, "unhandled error escaped the pipeline");
                Response::status(Status::InternalServerError)
            }
        }
    }
}

/// The rest of the pipeline, as seen from inside a middleware.
///
/// Call [`run`](Next::run) to continue, or drop it and return a response to
/// short-circuit.
pub struct Next {
    chain: Arc<Chain>,
    index: usize,
}

impl Next {
    /// Invoke the next layer, or the router once the layers are exhausted.
    pub fn run(self, req: Request) -> BoxFuture {
        match self.chain.layers.get(self.index) {
            Some(layer) => {
                let layer = Arc::clone(layer);
                let next = Self { chain: self.chain, index: self.index + 1 };
                layer.call(req, next)
            }
            None => self.chain.router.dispatch(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::method::Method;
    use crate::response::Outcome;

    static ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

    fn record(step: &'static str) {
        ORDER.lock().expect("order lock").push(step);
    }

    async fn outer(req: Request, next: Next) -> Outcome {
        record("outer:in");
        let res = next.run(req).await;
        record("outer:out");
        res
    }

    async fn inner(req: Request, next: Next) -> Outcome {
        record("inner:in");
        let res = next.run(req).await;
        record("inner:out");
        res
    }

    async fn gate(_req: Request, _next: Next) -> Outcome {
        Ok(Response::status(Status::Unauthorized))
    }

    async fn handler(_req: Request) -> Response {
        record("handler");
        Response::status(Status::NoContent)
    }

    async fn failing(_req: Request) -> Outcome {
        Err(crate::Error::Panic("boom".to_owned()))
    }

    #[tokio::test]
    async fn layers_run_in_registration_order_and_short_circuit() {
        let pipeline = Router::new()
            .on(Method::Get, "/", handler)
            .layer(outer)
            .layer(inner)
            .into_pipeline();

        let res = pipeline.call(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), 204);
        assert_eq!(
            *ORDER.lock().expect("order lock"),
            ["outer:in", "inner:in", "handler", "inner:out", "outer:out"]
        );

        let gated = Router::new()
            .on(Method::Get, "/", handler)
            .layer(gate)
            .into_pipeline();
        ORDER.lock().expect("order lock").clear();
        let res = gated.call(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), 401);
        assert!(ORDER.lock().expect("order lock").is_empty());
    }

    #[tokio::test]
    async fn escaped_error_becomes_bare_500() {
        let pipeline = Router::new().on(Method::Get, "/", failing).into_pipeline();
        let res = pipeline.call(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), 500);
        assert!(res.body().is_empty());
    }
}
