// CLAPI passthrough
//
// `POST {base}?action=action&object=centreon_clapi` with
// `{"action": "show", "object": "HOST", "values": "..."}`.
//
// The body mirrors a `centreon -o OBJECT -a ACTION -v VALUES` invocation.
// Objects and actions are not modelled; results come back as raw JSON.

use serde_json::json;
use tracing::debug;

use crate::ApiResponse;
use crate::client::CentreonClient;
use crate::error::Error;
use crate::request::json_request;

const CLAPI_QUERY: &str = "action=action&object=centreon_clapi";

impl CentreonClient {
    /// Run a CLAPI action, e.g. `clapi("show", "HOST", Some("web01"))`.
    pub async fn clapi(
        &self,
        action: &str,
        object: &str,
        values: Option<&str>,
    ) -> Result<ApiResponse, Error> {
        let url = self.action_url(CLAPI_QUERY)?;
        debug!(action, object, "running CLAPI action");

        let mut body = json!({
            "action": action,
            "object": object,
        });
        if let Some(v) = values {
            body["values"] = json!(v);
        }

        let request = json_request(url, body, Some(self.auth_headers()?));
        self.call(request).await
    }
}
