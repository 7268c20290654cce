//! Outgoing HTTP response type and the conversion traits handlers return.
//!
//! Build a [`Response`] in your handler and return it, or return a
//! `Result<Response, Error>` when something underneath can fail. The
//! [`recover`](crate::middleware::recover) layer takes care of the `Err`.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http_body_util::Full;
use serde::Serialize;

use crate::error::Error;
use crate::status::Status;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// What every handler and middleware ultimately yields.
pub type Outcome = Result<Response, Error>;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use roster::{Response, Status};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(Status::NoContent);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use roster::{Response, Status};
///
/// Response::builder()
///     .status(Status::Created)
///     .header("location", "/api/users/42")
///     .json(br#"{"id":42}"#.to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: u16,
}

impl Response {
    /// `200 OK`, `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK`, `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code.into() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok.into() }
    }

    pub fn status_code(&self) -> u16 { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into the hyper response type. Headers that are not valid on
    /// the wire are dropped; hyper derives `content-length` from the body.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = http::StatusCode::from_u16(self.status)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                res.headers_mut().append(name, value);
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: u16,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish(JSON, body)
    }

    /// Serialise `value` and terminate with it as a JSON body.
    pub fn json_value<T: Serialize + ?Sized>(self, value: &T) -> Result<Response, Error> {
        Ok(self.json(serde_json::to_vec(value)?))
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT, body.into().into_bytes())
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse / IntoOutcome ────────────────────────────────────────────────

/// Infallible conversion into an HTTP [`Response`].
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly from a handler: `return Status::NotFound`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

/// Anything a handler may return.
///
/// Plain responses convert into `Ok`; a `Result` keeps its error so the
/// pipeline can decide what the client sees.
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Outcome { Ok(self) }
}

impl IntoOutcome for &'static str {
    fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
}

impl IntoOutcome for Status {
    fn into_outcome(self) -> Outcome { Ok(self.into_response()) }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoResponse,
    E: Into<Error>,
{
    fn into_outcome(self) -> Outcome {
        self.map(IntoResponse::into_response).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_puts_content_type_first() {
        let res = Response::builder()
            .status(Status::Created)
            .header("location", "/api/users/3")
            .json(b"{}".to_vec());
        assert_eq!(res.status_code(), 201);
        assert_eq!(res.headers[0], ("content-type".to_owned(), JSON.to_owned()));
        assert_eq!(res.header("Location"), Some("/api/users/3"));
    }

    #[test]
    fn into_inner_drops_invalid_headers() {
        let res = Response::builder()
            .header("bad header", "x")
            .header("x-ok", "1")
            .text("hi")
            .into_inner();
        assert_eq!(res.status(), http::StatusCode::OK);
        assert_eq!(res.headers().len(), 2);
        assert_eq!(res.headers()["x-ok"], "1");
    }

    #[test]
    fn result_outcome_keeps_error() {
        let err: Result<Response, Error> = Err(Error::Panic("boom".into()));
        assert!(err.into_outcome().is_err());
        let ok = Status::NoContent.into_outcome().expect("status converts");
        assert_eq!(ok.status_code(), 204);
    }
}
