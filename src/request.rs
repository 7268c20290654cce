//! Incoming HTTP request type.

use std::collections::HashMap;

use crate::method::Method;

/// An incoming HTTP request, collected from hyper before the pipeline runs.
///
/// The server builds these from the wire. Tests and in-process callers build
/// them with [`Request::new`] and the `with_*` setters:
///
/// ```rust
/// use roster::{Method, Request};
///
/// let req = Request::new(Method::Post, "/api/users")
///     .with_header("authorization", "Bearer a.b.c")
///     .with_body(br#"{"firstName":"Ann"}"#.to_vec());
/// assert_eq!(req.header("Authorization"), Some("Bearer a.b.c"));
/// ```
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Vec::new(),
            params: HashMap::new(),
        }
    }

    pub(crate) fn from_parts(
        method: Method,
        path: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> Self {
        Self { method, path, headers, body, params: HashMap::new() }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/users/{id}`, `req.param("id")` on `/api/users/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
