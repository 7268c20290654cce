//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler; you register a middleware, it wraps every route.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Middleware};
use crate::pipeline::Pipeline;
use crate::request::Request;
use crate::response::{Outcome, Response};
use crate::status::Status;

/// The application router.
///
/// Build it once at startup, then hand it to [`Server::serve`](crate::Server::serve)
/// or freeze it into a [`Pipeline`] yourself. Each registration returns
/// `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    pub(crate) layers: Vec<BoxedMiddleware>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), layers: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use roster::{Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// # async fn delete_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Delete, "/api/users/{id}", delete_user)
    ///     .on(Method::Get,    "/api/users/{id}", get_user)
    ///     .on(Method::Post,   "/api/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Wrap every route in `middleware`.
    ///
    /// Layers run in registration order: the first one registered is the
    /// outermost and sees the request first and the response last.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(middleware.into_boxed_middleware());
        self
    }

    /// Freeze the routes and layers into a callable [`Pipeline`].
    pub fn into_pipeline(self) -> Pipeline {
        Pipeline::new(self)
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        // Matching runs on the raw path so `%2F` never splits a segment;
        // values are decoded afterwards. Invalid UTF-8 is kept as sent.
        let params = matched.params.iter()
            .map(|(k, v)| {
                let value = urlencoding::decode(v).map_or_else(|_| v.to_owned(), Cow::into_owned);
                (k.to_owned(), value)
            })
            .collect();
        Some((handler, params))
    }

    /// True if `path` is routed under any method.
    fn knows(&self, path: &str) -> bool {
        self.routes.values().any(|tree| tree.at(path).is_ok())
    }

    /// Innermost step of the pipeline: find the handler and call it.
    pub(crate) fn dispatch(&self, mut req: Request) -> BoxFuture {
        match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => {
                req.params = params;
                handler.call(req)
            }
            None => {
                let status = if self.knows(req.path()) {
                    Status::MethodNotAllowed
                } else {
                    Status::NotFound
                };
                let res: Outcome = Ok(Response::status(status));
                Box::pin(async move { res })
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
