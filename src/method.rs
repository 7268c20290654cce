//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods plus an `Extension` variant for any
//! other method token (`PROPFIND`, `PURGE`, ...). Extension methods travel the
//! full middleware pipeline like any other request; the router answers them
//! with `405` or `404` unless a route was registered for them.

use std::fmt;
use std::str::FromStr;

/// An HTTP request method.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
    /// Any other syntactically valid method token, kept verbatim.
    Extension(Box<str>),
}

impl Method {
    const STANDARD: [Method; 9] = [
        Self::Connect,
        Self::Delete,
        Self::Get,
        Self::Head,
        Self::Options,
        Self::Patch,
        Self::Post,
        Self::Put,
        Self::Trace,
    ];

    /// Returns the wire representation (e.g. `"GET"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Trace   => "TRACE",
            Self::Extension(token) => token,
        }
    }

    fn from_token(token: &str) -> Self {
        Self::STANDARD
            .into_iter()
            .find(|m| m.as_str() == token)
            .unwrap_or_else(|| Self::Extension(token.into()))
    }
}

/// Parses a method token. Case-sensitive per RFC 9110 §9.1, so `"get"` is an
/// extension method, not `GET`. Fails only for strings that are not a token.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(is_tchar) {
            return Err(());
        }
        Ok(Self::from_token(s))
    }
}

/// hyper has already validated the token.
impl From<&http::Method> for Method {
    fn from(method: &http::Method) -> Self {
        Self::from_token(method.as_str())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// RFC 9110 §5.6.2.
fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_methods_case_sensitively() {
        assert_eq!("PUT".parse::<Method>(), Ok(Method::Put));
        assert_eq!("DELETE".parse::<Method>(), Ok(Method::Delete));
        assert_eq!("get".parse::<Method>(), Ok(Method::Extension("get".into())));
    }

    #[test]
    fn unknown_tokens_become_extensions() {
        assert_eq!("PROPFIND".parse::<Method>(), Ok(Method::Extension("PROPFIND".into())));
        assert_eq!(Method::from(&http::Method::from_bytes(b"PURGE").expect("token")).as_str(), "PURGE");
    }

    #[test]
    fn rejects_non_tokens() {
        assert!("".parse::<Method>().is_err());
        assert!("GET X".parse::<Method>().is_err());
        assert!("G(ET".parse::<Method>().is_err());
    }

    #[test]
    fn displays_wire_form() {
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Extension("MKCOL".into()).to_string(), "MKCOL");
    }
}
