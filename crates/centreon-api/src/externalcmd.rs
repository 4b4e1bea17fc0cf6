// External command endpoint
//
// `POST {base}?object=centreon_monitoring_externalcmd&action=send`
//
// Every acknowledgement helper builds one `ExternalCommand` and submits it
// as a single-entry batch.

use tracing::debug;

use crate::ApiResponse;
use crate::client::CentreonClient;
use crate::command::{AckOptions, CommandBatch, ExternalCommand};
use crate::error::Error;
use crate::request::json_request;

const EXTERNAL_CMD_QUERY: &str = "object=centreon_monitoring_externalcmd&action=send";

impl CentreonClient {
    /// Submit a batch of external commands.
    ///
    /// The server routes each entry to its `poller_id`.
    pub async fn send_commands(&self, commands: &[ExternalCommand]) -> Result<ApiResponse, Error> {
        let url = self.action_url(EXTERNAL_CMD_QUERY)?;
        let body = serde_json::to_value(CommandBatch { commands })?;

        debug!(count = commands.len(), "sending external commands");

        let request = json_request(url, body, Some(self.auth_headers()?));
        self.call(request).await
    }

    /// Acknowledge a host problem.
    ///
    /// Sends `ACKNOWLEDGE_HOST_PROBLEM;host;sticky;notify;persistent;author;comment`.
    pub async fn acknowledge_host(
        &self,
        host_name: &str,
        poller_id: u32,
        author: &str,
        options: &AckOptions,
    ) -> Result<ApiResponse, Error> {
        debug!(host_name, poller_id, "acknowledging host problem");
        let command = ExternalCommand::acknowledge_host(host_name, poller_id, author, options);
        self.send_commands(std::slice::from_ref(&command)).await
    }

    /// Remove a host acknowledgement.
    pub async fn unacknowledge_host(
        &self,
        host_name: &str,
        poller_id: u32,
        timestamp: Option<i64>,
    ) -> Result<ApiResponse, Error> {
        debug!(host_name, poller_id, "removing host acknowledgement");
        let command = ExternalCommand::remove_host_acknowledgement(host_name, poller_id, timestamp);
        self.send_commands(std::slice::from_ref(&command)).await
    }

    /// Acknowledge a service problem.
    ///
    /// Sends `ACKNOWLEDGE_SVC_PROBLEM;host;service;sticky;notify;persistent;author;comment`.
    pub async fn acknowledge_service(
        &self,
        host_name: &str,
        service_description: &str,
        poller_id: u32,
        author: &str,
        options: &AckOptions,
    ) -> Result<ApiResponse, Error> {
        debug!(host_name, service_description, poller_id, "acknowledging service problem");
        let command = ExternalCommand::acknowledge_service(
            host_name,
            service_description,
            poller_id,
            author,
            options,
        );
        self.send_commands(std::slice::from_ref(&command)).await
    }

    /// Remove a service acknowledgement.
    pub async fn unacknowledge_service(
        &self,
        host_name: &str,
        service_description: &str,
        poller_id: u32,
        timestamp: Option<i64>,
    ) -> Result<ApiResponse, Error> {
        debug!(host_name, service_description, poller_id, "removing service acknowledgement");
        let command = ExternalCommand::remove_service_acknowledgement(
            host_name,
            service_description,
            poller_id,
            timestamp,
        );
        self.send_commands(std::slice::from_ref(&command)).await
    }
}
