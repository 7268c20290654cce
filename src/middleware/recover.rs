//! Failure boundary.
//!
//! Anything the inner layers could not turn into a response ends here: an
//! `Err` outcome or a panic. The client gets a fixed `500` with
//! `{"error":"Internal server error."}`; the detail goes to the log, never
//! to the wire. Nothing is retried and nothing propagates further, so one
//! broken request cannot take the connection task down with it.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::error;

use crate::error::Error;
use crate::pipeline::Next;
use crate::request::Request;
use crate::response::{Outcome, Response};
use crate::status::Status;

const BODY: &[u8] = br#"{"error":"Internal server error."}"#;

/// Outermost layer: catch everything below it.
pub async fn recover(req: Request, next: Next) -> Outcome {
    let method = req.method().clone();
    let path = req.path().to_owned();

    let failure = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(Ok(res)) => return Ok(res),
        Ok(Err(e)) => e,
        Err(payload) => Error::Panic(panic_message(payload.as_ref())),
    };

    error!(%method, %path, error = %failure, "request failed");
    Ok(internal_error())
}

fn internal_error() -> Response {
    Response::builder()
        .status(Status::InternalServerError)
        .json(BODY.to_vec())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::router::Router;

    async fn panics(_req: Request) -> Response {
        panic!("handler exploded");
    }

    async fn fails(_req: Request) -> Outcome {
        Err(Error::Panic("store unavailable".to_owned()))
    }

    async fn fine(_req: Request) -> Response {
        Response::text("ok")
    }

    fn pipeline() -> crate::Pipeline {
        Router::new()
            .on(Method::Get, "/panic", panics)
            .on(Method::Get, "/fail", fails)
            .on(Method::Get, "/ok", fine)
            .layer(recover)
            .into_pipeline()
    }

    #[tokio::test]
    async fn panic_becomes_generic_500() {
        let res = pipeline().call(Request::new(Method::Get, "/panic")).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), BODY);
        assert_eq!(res.header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn error_becomes_generic_500_without_details() {
        let res = pipeline().call(Request::new(Method::Get, "/fail")).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), BODY);
    }

    #[tokio::test]
    async fn success_passes_through_untouched() {
        let res = pipeline().call(Request::new(Method::Get, "/ok")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"ok");
    }

    #[test]
    fn panic_message_reads_both_string_kinds() {
        let borrowed: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(borrowed.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
