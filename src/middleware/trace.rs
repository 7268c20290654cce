//! Per-request log events: method and path on the way in, status and latency
//! on the way out.

use std::time::Instant;

use tracing::info;

use crate::pipeline::Next;
use crate::request::Request;
use crate::response::Outcome;

/// Log the request, call onward exactly once, log the resulting status.
///
/// A failed outcome is passed up untouched and left for
/// [`recover`](super::recover) to log.
pub async fn trace(req: Request, next: Next) -> Outcome {
    let method = req.method().clone();
    let path = req.path().to_owned();
    info!(%method, %path, "request");

    let started = Instant::now();
    let outcome = next.run(req).await;

    if let Ok(res) = &outcome {
        info!(
            %method,
            %path,
            status = res.status_code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response",
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::method::Method;
    use crate::response::Response;
    use crate::router::Router;
    use crate::status::Status;

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    async fn counted(_req: Request) -> Response {
        CALLS.fetch_add(1, Ordering::SeqCst);
        Response::status(Status::NoContent)
    }

    #[tokio::test]
    async fn calls_onward_exactly_once_and_keeps_the_response() {
        let pipeline = Router::new()
            .on(Method::Delete, "/x", counted)
            .layer(trace)
            .into_pipeline();

        let res = pipeline.call(Request::new(Method::Delete, "/x")).await;
        assert_eq!(res.status_code(), 204);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
