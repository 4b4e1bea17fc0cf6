// Metrics endpoint
//
// `GET {base}?object=centreon_metric&action=metricsDataByService&ids=..&start=..&end=..`
//
// Returns loosely-typed JSON: the series layout depends on the metrics each
// service publishes.

use tracing::debug;
use url::Url;

use crate::ApiResponse;
use crate::client::CentreonClient;
use crate::error::Error;
use crate::request::get_request;

impl CentreonClient {
    /// Fetch metric series for one or more services between two epoch timestamps.
    ///
    /// `host_service_ids` goes into the query string untouched, in the form
    /// Centreon expects (`hostId_serviceId`, comma separated).
    pub async fn metrics_data_by_service(
        &self,
        host_service_ids: &str,
        start: i64,
        end: i64,
    ) -> Result<ApiResponse, Error> {
        let url = self.metrics_url(host_service_ids, start, end)?;
        debug!(host_service_ids, start, end, "fetching service metrics");

        let request = get_request(url, Some(self.auth_headers()?));
        self.call(request).await
    }

    pub(crate) fn metrics_url(&self, host_service_ids: &str, start: i64, end: i64) -> Result<Url, Error> {
        self.action_url(&format!(
            "object=centreon_metric&action=metricsDataByService&ids={host_service_ids}&start={start}&end={end}"
        ))
    }
}
