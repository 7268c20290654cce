//! Unified error type.

use crate::users::StoreError;

/// The error type that flows through the request pipeline and out of
/// [`Server::serve`](crate::Server::serve).
///
/// Expected application outcomes (404, 400, 401) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// the failures nobody planned for: binding a port, a broken store, a value
/// that refuses to serialise, a handler that panicked. Inside the pipeline
/// the [`recover`](crate::middleware::recover) layer turns every one of them
/// into a generic `500`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("panic: {0}")]
    Panic(String),
}
