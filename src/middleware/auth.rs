//! Bearer-token presence check.
//!
//! This is a *shape* check, not authentication in any cryptographic sense.
//! A request passes when its `Authorization` header carries something that
//! looks like a compact JWT. Nothing is decoded, no signature is verified,
//! no claim or expiry is read.

use tracing::debug;

use crate::pipeline::Next;
use crate::request::Request;
use crate::response::{Outcome, Response};
use crate::status::Status;

const SCHEME: &str = "Bearer ";

/// Tokens longer than this are refused outright.
const MAX_TOKEN_LEN: usize = 250 * 1024;

/// Reject with `401 Unauthorized` unless the request carries a well-formed
/// bearer token.
pub async fn bearer(req: Request, next: Next) -> Outcome {
    let Some(value) = req.header("authorization") else {
        debug!(path = req.path(), "missing authorization header");
        return Ok(unauthorized());
    };

    // A bare token without the scheme is tolerated.
    let token = value.strip_prefix(SCHEME).unwrap_or(value);
    if !is_compact_jwt(token) {
        debug!(path = req.path(), "unreadable bearer token");
        return Ok(unauthorized());
    }

    next.run(req).await
}

fn unauthorized() -> Response {
    Response::builder()
        .status(Status::Unauthorized)
        .text("Unauthorized")
}

/// True if `token` is a structurally valid compact JWS (three segments) or
/// JWE (five segments).
///
/// JWS: header and payload non-empty, signature may be empty (unsecured
/// tokens). JWE: only the encrypted-key segment may be empty (direct
/// encryption).
pub(crate) fn is_compact_jwt(token: &str) -> bool {
    if token.trim().is_empty() || token.len() > MAX_TOKEN_LEN {
        return false;
    }

    let segments: Vec<&str> = token.split('.').collect();
    if !segments.iter().all(|s| s.bytes().all(is_base64url)) {
        return false;
    }

    match segments.as_slice() {
        [header, payload, _signature] => !header.is_empty() && !payload.is_empty(),
        [header, _key, iv, ciphertext, tag] => {
            [header, iv, ciphertext, tag].iter().all(|s| !s.is_empty())
        }
        _ => false,
    }
}

fn is_base64url(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
