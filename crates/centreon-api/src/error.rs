use thiserror::Error;

/// Top-level error type for the `centreon-api` crate.
///
/// Keeps the ways a call can fail apart: the request never got a response
/// (`Transport`), the upstream answered with something other than HTTP 200
/// (`Upstream`), the body of a response could not be read (`ResponseBody`),
/// or a 200 body could not be decoded (`Deserialization`).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured entry point already has a query or fragment, so action
    /// parameters cannot be appended to it.
    #[error("Invalid base URL (must not carry a query or fragment): {0}")]
    InvalidBaseUrl(String),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A header value (usually the auth token) is not a valid HTTP header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    // ── Upstream ────────────────────────────────────────────────────
    /// The API answered with a status other than 200. The body is kept
    /// verbatim; Centreon usually sends a JSON string or an HTML error page.
    #[error("Centreon API error (HTTP {status}): {}", preview(.body))]
    Upstream { status: u16, body: String },

    /// A response arrived but its body could not be read.
    #[error("failed to read response body (HTTP {status}): {source}")]
    ResponseBody {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed on a 200 response, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the upstream refused our credentials or token.
    ///
    /// Callers should re-authenticate; the client never does it on its own.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Upstream { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Upstream { status, .. } => *status >= 500,
            Self::ResponseBody { .. } => true,
            _ => false,
        }
    }

    /// The upstream HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::ResponseBody { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// First 200 characters of a body, for error messages and logs.
pub(crate) fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A `reqwest::Error` that never touched the network.
    fn builder_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("not a url")
            .build()
            .err()
            .unwrap_or_else(|| panic!("an unparseable URL should not build"))
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = Error::Transport(builder_error());
        assert_eq!(err.status(), None);
        assert!(!err.is_auth_rejected());
        assert!(!err.is_transient());
    }

    #[test]
    fn unreadable_body_keeps_its_status() {
        let err = Error::ResponseBody {
            status: 200,
            source: builder_error(),
        };
        assert_eq!(err.status(), Some(200));
        assert!(err.is_transient());
        assert!(err.to_string().starts_with("failed to read response body (HTTP 200): "));
    }

    #[test]
    fn auth_rejection_is_401_or_403() {
        let unauthorized = Error::Upstream {
            status: 401,
            body: String::new(),
        };
        let forbidden = Error::Upstream {
            status: 403,
            body: "\"Forbidden\"".into(),
        };
        let server = Error::Upstream {
            status: 500,
            body: String::new(),
        };

        assert!(unauthorized.is_auth_rejected());
        assert!(forbidden.is_auth_rejected());
        assert!(!server.is_auth_rejected());
    }

    #[test]
    fn server_errors_are_transient() {
        let bad_gateway = Error::Upstream {
            status: 502,
            body: String::new(),
        };
        let bad_request = Error::Upstream {
            status: 400,
            body: String::new(),
        };
        let decode = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };

        assert!(bad_gateway.is_transient());
        assert!(!bad_request.is_transient());
        assert!(!decode.is_transient());
        assert_eq!(bad_gateway.status(), Some(502));
        assert_eq!(decode.status(), None);
    }

    #[test]
    fn upstream_message_truncates_long_bodies() {
        let err = Error::Upstream {
            status: 500,
            body: "x".repeat(1000),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Centreon API error (HTTP 500): "));
        assert_eq!(msg.len(), "Centreon API error (HTTP 500): ".len() + 200);
    }
}
