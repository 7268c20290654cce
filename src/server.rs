//! HTTP server and graceful shutdown.
//!
//! On SIGTERM, Ctrl-C or the caller's shutdown future the accept loop stops
//! and every open connection is told to wind down: idle keep-alive
//! connections close at once, requests already in flight finish and get
//! their response. `serve` returns when the last connection has closed.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::pipeline::Pipeline;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

enum Listen {
    Addr(SocketAddr),
    Bound(TcpListener),
}

/// The HTTP server.
pub struct Server {
    listen: Listen,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// ```rust,no_run
    /// use roster::Server;
    /// let server = Server::bind(([0, 0, 0, 0], 3000).into());
    /// ```
    pub fn bind(addr: SocketAddr) -> Self {
        Self { listen: Listen::Addr(addr) }
    }

    /// Serves on a listener that is already bound. Handy with port `0`,
    /// where the caller needs `local_addr()` before serving.
    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listen: Listen::Bound(listener) }
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but stops when `signal` resolves
    /// instead of waiting for a process signal.
    pub async fn serve_with_shutdown(
        self,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let listener = match self.listen {
            Listen::Addr(addr) => TcpListener::bind(addr).await?,
            Listen::Bound(listener) => listener,
        };
        let addr = listener.local_addr()?;

        let pipeline = router.into_pipeline();

        info!(%addr, "roster listening");

        // `auto::Builder` handles both HTTP/1.1 and HTTP/2, whatever the
        // client negotiates.
        let builder = ConnBuilder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();
        let mut tasks = tokio::task::JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM immediately stops
                // accepting new connections, even if more are queued.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let pipeline = pipeline.clone();
                    let io = TokioIo::new(stream);

                    // Called once per request on the connection, not once per
                    // connection.
                    let svc = service_fn(move |req| {
                        let pipeline = pipeline.clone();
                        async move { dispatch(pipeline, req).await }
                    });
                    let conn = graceful.watch(builder.serve_connection(io, svc).into_owned());

                    tasks.spawn(async move {
                        if let Err(e) = conn.await {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        drop(listener);
        graceful.shutdown().await;
        while tasks.join_next().await.is_some() {}

        info!("roster stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Turns one hyper request into a [`Request`], runs the pipeline, and hands
/// the [`Response`] back to hyper.
///
/// The error type is [`Infallible`]: every failure becomes a status code
/// here or in the pipeline, so hyper never sees an error. Every method,
/// including extension methods, goes through the pipeline.
async fn dispatch(
    pipeline: Pipeline,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let method = Method::from(req.method());

    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(%method, path = parts.uri.path(), "failed to read request body: {e}");
            return Ok(Response::status(Status::BadRequest).into_inner());
        }
    };

    // Header values that are not visible ASCII are dropped.
    let headers = parts.headers.iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
        })
        .collect();

    let request = Request::from_parts(method, parts.uri.path().to_owned(), headers, body.to_vec());
    Ok(pipeline.call(request).await.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C).
/// On Windows only Ctrl-C is available. A handler that cannot be installed
/// is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    // `pending()` never resolves: on non-Unix platforms the SIGTERM arm is
    // effectively disabled.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
