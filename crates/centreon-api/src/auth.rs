// Session authentication
//
// `?action=authenticate` takes form-encoded credentials and answers with
// `{"authToken": "..."}`. The token is then presented on every call through
// the `centreon-auth-token` header. There is no logout and no refresh
// endpoint; a rejected token means logging in again.

use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{CentreonClient, ClientConfig};
use crate::error::Error;
use crate::request::form_request;
use crate::transport::TransportConfig;

/// Result of [`CentreonClient::connect`].
///
/// Login failure does not lose the client: it is handed back together with
/// the error so the caller can retry [`authenticate`](CentreonClient::authenticate)
/// once the cause is fixed.
#[derive(Debug)]
pub enum ConnectOutcome {
    /// Logged in, token stored.
    Ready(CentreonClient),
    /// The client was built but the login call failed.
    AuthFailed { client: CentreonClient, error: Error },
}

impl ConnectOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The client, whether or not it holds a token.
    pub fn into_client(self) -> CentreonClient {
        match self {
            Self::Ready(client) | Self::AuthFailed { client, .. } => client,
        }
    }

    /// Collapse into a `Result`, dropping the unauthenticated client on failure.
    pub fn into_result(self) -> Result<CentreonClient, Error> {
        match self {
            Self::Ready(client) => Ok(client),
            Self::AuthFailed { error, .. } => Err(error),
        }
    }
}

impl CentreonClient {
    /// Build a client and log in.
    ///
    /// Only an unbuildable HTTP client is a hard error; a failed login is
    /// reported through [`ConnectOutcome::AuthFailed`].
    pub async fn connect(
        config: ClientConfig,
        transport: &TransportConfig,
    ) -> Result<ConnectOutcome, Error> {
        let client = Self::new(config, transport)?;
        Ok(match client.authenticate().await {
            Ok(()) => ConnectOutcome::Ready(client),
            Err(error) => {
                warn!(error = %error, "authentication failed");
                ConnectOutcome::AuthFailed { client, error }
            }
        })
    }

    /// Log in with the configured credentials and store the session token.
    ///
    /// `POST {base}?action=authenticate` with form fields `username` and
    /// `password`. On any failure the previously stored token, if any, is
    /// left untouched.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let url = self.action_url("action=authenticate")?;

        debug!("authenticating at {url}");

        let request = form_request(
            url,
            &[
                ("username", self.config().username.as_str()),
                ("password", self.config().password.expose_secret()),
            ],
            None,
        );

        let body = self.call(request).await?;
        let token = body
            .get("authToken")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Deserialization {
                message: "authenticate response has no string `authToken` field".into(),
                body: body.to_string(),
            })?;

        self.set_auth_token(token);

        debug!("authentication successful");
        Ok(())
    }
}
