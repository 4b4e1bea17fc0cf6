// Centreon legacy API HTTP client
//
// Wraps `reqwest::Client` with the legacy API's URL scheme (a single
// `index.php` entry point selected by `?object=...&action=...`), the
// `centreon-auth-token` header and the 200-only response contract. Endpoint
// families (external commands, metrics, CLAPI) and the login flow are
// implemented as inherent methods in separate files.

use std::sync::RwLock;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{self, Error};
use crate::request::{Payload, PreparedRequest, RawResponse};
use crate::transport::TransportConfig;

/// Header carrying the session token on every authenticated call.
pub const AUTH_TOKEN_HEADER: &str = "centreon-auth-token";

/// Connection settings for one Centreon central server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The legacy API entry point, e.g.
    /// `https://central.example.com/centreon/api/index.php`.
    /// Action parameters are appended as a query string, so this URL must
    /// not carry a query or fragment of its own; every call fails with
    /// [`Error::InvalidBaseUrl`] if it does.
    pub base_url: Url,
    pub username: String,
    pub password: SecretString,
}

impl ClientConfig {
    pub fn new(base_url: Url, username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            base_url,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// HTTP client for the Centreon legacy (v1) REST API.
///
/// Holds the connection settings and the session token. The token is only
/// ever written by [`authenticate`](Self::authenticate) (or explicitly via
/// [`set_auth_token`](Self::set_auth_token)); nothing clears it and nothing
/// refreshes it behind the caller's back.
#[derive(Debug)]
pub struct CentreonClient {
    http: reqwest::Client,
    config: ClientConfig,
    /// Session token from `?action=authenticate`.
    auth_token: RwLock<Option<SecretString>>,
}

impl CentreonClient {
    /// Create a client from a `TransportConfig`. Performs no network I/O.
    pub fn new(config: ClientConfig, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, config))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            http,
            config,
            auth_token: RwLock::new(None),
        }
    }

    /// The connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The legacy API entry point.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Session token ────────────────────────────────────────────────

    /// Whether a token is currently held.
    ///
    /// This says nothing about whether the server still accepts it.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token
            .read()
            .expect("auth token lock poisoned")
            .is_some()
    }

    /// The current session token, if any.
    pub fn auth_token(&self) -> Option<SecretString> {
        self.auth_token
            .read()
            .expect("auth token lock poisoned")
            .clone()
    }

    /// Replace the session token, e.g. with one obtained by another client.
    pub fn set_auth_token(&self, token: impl Into<String>) {
        debug!("storing auth token");
        *self.auth_token.write().expect("auth token lock poisoned") =
            Some(SecretString::from(token.into()));
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append a raw query string to the entry point: `{base}?{query}`.
    ///
    /// The query is concatenated as-is; callers own its encoding. A base URL
    /// that already carries a query or fragment is rejected before anything
    /// is sent.
    pub(crate) fn action_url(&self, query: &str) -> Result<Url, Error> {
        let base = &self.config.base_url;
        if base.query().is_some() || base.fragment().is_some() {
            return Err(Error::InvalidBaseUrl(base.to_string()));
        }
        let full = format!("{base}?{query}");
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Headers sent on every authenticated call.
    ///
    /// Without a token the header is sent empty and the server rejects the
    /// call, which surfaces as an `Upstream` error.
    pub(crate) fn auth_headers(&self) -> Result<HeaderMap, Error> {
        let token = self
            .auth_token()
            .map(|t| t.expose_secret().to_owned())
            .unwrap_or_default();

        if token.is_empty() {
            warn!("no auth token held, the request will be rejected");
        }

        let mut token_value =
            HeaderValue::from_str(&token).map_err(|e| Error::InvalidHeader(e.to_string()))?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), token_value);
        Ok(headers)
    }

    /// Send a prepared request exactly once.
    ///
    /// Never fails: transport errors come back as a `RawResponse` with no
    /// status, so every caller goes through the same status branch.
    pub async fn dispatch(&self, request: PreparedRequest) -> RawResponse {
        let PreparedRequest {
            method,
            url,
            headers,
            payload,
        } = request;

        debug!("{method} {url}");

        let builder = self.http.request(method, url).headers(headers);
        let builder = match payload {
            Payload::Form(fields) => builder.form(&fields),
            Payload::Json(body) => builder.json(&body),
            Payload::Empty => builder,
        };

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "request failed before a response was received");
                return RawResponse::NoResponse(e);
            }
        };

        let status = resp.status();
        match resp.text().await {
            Ok(body) => {
                if status != reqwest::StatusCode::OK {
                    debug!(
                        status = status.as_u16(),
                        body = error::preview(&body),
                        "non-200 response"
                    );
                }
                RawResponse::Received { status, body }
            }
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "failed to read response body");
                RawResponse::Unreadable { status, error: e }
            }
        }
    }

    /// Dispatch and apply the 200-only contract.
    pub(crate) async fn call(&self, request: PreparedRequest) -> Result<Value, Error> {
        self.dispatch(request).await.into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CentreonClient {
        let base_url = Url::parse(base).unwrap_or_else(|e| panic!("test URL: {e}"));
        CentreonClient::with_client(
            reqwest::Client::new(),
            ClientConfig::new(base_url, "admin", "centreon".to_owned()),
        )
    }

    #[test]
    fn action_url_appends_query_to_entry_point() {
        let c = client("https://central.example.com/centreon/api/index.php");
        let url = c.action_url("object=centreon_metric&action=metricsDataByService");
        assert_eq!(
            url.ok().map(String::from),
            Some(
                "https://central.example.com/centreon/api/index.php?object=centreon_metric&action=metricsDataByService"
                    .to_owned()
            )
        );
    }

    #[test]
    fn action_url_rejects_base_with_query_or_fragment() {
        for base in [
            "https://central.example.com/centreon/api/index.php?lang=en",
            "https://central.example.com/centreon/api/index.php#top",
        ] {
            let c = client(base);
            match c.action_url("action=authenticate") {
                Err(Error::InvalidBaseUrl(url)) => assert_eq!(url, base),
                other => panic!("expected InvalidBaseUrl for {base}, got: {other:?}"),
            }
        }
    }

    #[test]
    fn token_starts_empty_and_is_replaceable() {
        let c = client("https://central.example.com/centreon/api/index.php");
        assert!(!c.is_authenticated());
        assert!(c.auth_token().is_none());

        c.set_auth_token("abc");
        assert!(c.is_authenticated());
        assert_eq!(
            c.auth_token().map(|t| t.expose_secret().to_owned()),
            Some("abc".to_owned())
        );
    }

    #[test]
    fn auth_headers_carry_token_and_json_content_type() {
        let c = client("https://central.example.com/centreon/api/index.php");
        c.set_auth_token("tok");
        let headers = c.auth_headers().unwrap_or_default();
        assert_eq!(
            headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            headers.get(AUTH_TOKEN_HEADER).and_then(|v| v.to_str().ok()),
            Some("tok")
        );
    }

    #[test]
    fn auth_headers_without_token_send_empty_value() {
        let c = client("https://central.example.com/centreon/api/index.php");
        let headers = c.auth_headers().unwrap_or_default();
        assert_eq!(
            headers.get(AUTH_TOKEN_HEADER).and_then(|v| v.to_str().ok()),
            Some("")
        );
    }

    #[test]
    fn token_with_newline_is_rejected_as_header() {
        let c = client("https://central.example.com/centreon/api/index.php");
        c.set_auth_token("bad\ntoken");
        assert!(matches!(c.auth_headers(), Err(Error::InvalidHeader(_))));
    }
}
