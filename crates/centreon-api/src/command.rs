// External command models
//
// Centreon Engine consumes external commands as a single line: the command
// name followed by its arguments, joined with `;`. The REST API wraps these
// lines in a `{ "commands": [...] }` batch, each entry routed to one poller.
//
// Arguments are joined verbatim. A `;` inside a host name, author or comment
// shifts every following field on the engine side; the upstream parser has
// no escaping, so none is applied here either.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

/// The external commands this client knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
pub enum CommandKind {
    #[strum(serialize = "ACKNOWLEDGE_HOST_PROBLEM")]
    AcknowledgeHostProblem,
    #[strum(serialize = "REMOVE_HOST_ACKNOWLEDGEMENT")]
    RemoveHostAcknowledgement,
    #[strum(serialize = "ACKNOWLEDGE_SVC_PROBLEM")]
    AcknowledgeSvcProblem,
    #[strum(serialize = "REMOVE_SVC_ACKNOWLEDGEMENT")]
    RemoveSvcAcknowledgement,
}

/// Acknowledgement modifiers.
///
/// `sticky`, `notify` and `persistent` are sent as-is; Centreon Engine
/// defines their accepted values (`sticky` is `0`, `1` or `2`, the others
/// `0` or `1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckOptions {
    pub comment: String,
    pub sticky: String,
    pub notify: String,
    pub persistent: String,
    /// Epoch seconds. `None` means "now", resolved when the command is built.
    pub timestamp: Option<i64>,
}

impl Default for AckOptions {
    fn default() -> Self {
        Self {
            comment: String::new(),
            sticky: "2".into(),
            notify: "0".into(),
            persistent: "0".into(),
            timestamp: None,
        }
    }
}

impl AckOptions {
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A single entry of the `commands` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalCommand {
    pub poller_id: u32,
    pub timestamp: i64,
    pub command: String,
}

impl ExternalCommand {
    /// Build a command from its kind and ordered arguments.
    ///
    /// A missing timestamp resolves to the current time, once per call.
    pub fn new(kind: CommandKind, poller_id: u32, timestamp: Option<i64>, fields: &[&str]) -> Self {
        let command = std::iter::once(kind.as_ref())
            .chain(fields.iter().copied())
            .collect::<Vec<_>>()
            .join(";");

        Self {
            poller_id,
            timestamp: timestamp.unwrap_or_else(now),
            command,
        }
    }

    /// `ACKNOWLEDGE_HOST_PROBLEM;host;sticky;notify;persistent;author;comment`
    pub fn acknowledge_host(host_name: &str, poller_id: u32, author: &str, options: &AckOptions) -> Self {
        Self::new(
            CommandKind::AcknowledgeHostProblem,
            poller_id,
            options.timestamp,
            &[
                host_name,
                options.sticky.as_str(),
                options.notify.as_str(),
                options.persistent.as_str(),
                author,
                options.comment.as_str(),
            ],
        )
    }

    /// `REMOVE_HOST_ACKNOWLEDGEMENT;host`
    pub fn remove_host_acknowledgement(host_name: &str, poller_id: u32, timestamp: Option<i64>) -> Self {
        Self::new(
            CommandKind::RemoveHostAcknowledgement,
            poller_id,
            timestamp,
            &[host_name],
        )
    }

    /// `ACKNOWLEDGE_SVC_PROBLEM;host;service;sticky;notify;persistent;author;comment`
    pub fn acknowledge_service(
        host_name: &str,
        service_description: &str,
        poller_id: u32,
        author: &str,
        options: &AckOptions,
    ) -> Self {
        Self::new(
            CommandKind::AcknowledgeSvcProblem,
            poller_id,
            options.timestamp,
            &[
                host_name,
                service_description,
                options.sticky.as_str(),
                options.notify.as_str(),
                options.persistent.as_str(),
                author,
                options.comment.as_str(),
            ],
        )
    }

    /// `REMOVE_SVC_ACKNOWLEDGEMENT;host;service`
    pub fn remove_service_acknowledgement(
        host_name: &str,
        service_description: &str,
        poller_id: u32,
        timestamp: Option<i64>,
    ) -> Self {
        Self::new(
            CommandKind::RemoveSvcAcknowledgement,
            poller_id,
            timestamp,
            &[host_name, service_description],
        )
    }

    /// The command name, i.e. everything before the first `;`.
    pub fn name(&self) -> &str {
        self.command.split(';').next().unwrap_or_default()
    }
}

/// Request body for `centreon_monitoring_externalcmd` / `send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandBatch<'a> {
    pub commands: &'a [ExternalCommand],
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn acknowledge_host_with_defaults() {
        let cmd = ExternalCommand::acknowledge_host("host1", 5, "alice", &AckOptions::default());
        assert_eq!(cmd.command, "ACKNOWLEDGE_HOST_PROBLEM;host1;2;0;0;alice;");
        assert_eq!(cmd.poller_id, 5);
        assert_eq!(cmd.name(), "ACKNOWLEDGE_HOST_PROBLEM");
    }

    #[test]
    fn acknowledge_service_field_order() {
        let options = AckOptions {
            comment: "on it".into(),
            sticky: "1".into(),
            notify: "1".into(),
            persistent: "1".into(),
            timestamp: Some(1_700_000_000),
        };
        let cmd = ExternalCommand::acknowledge_service("web01", "HTTP", 2, "bob", &options);
        assert_eq!(cmd.command, "ACKNOWLEDGE_SVC_PROBLEM;web01;HTTP;1;1;1;bob;on it");
        assert_eq!(cmd.timestamp, 1_700_000_000);
    }

    #[test]
    fn remove_acknowledgements() {
        let host = ExternalCommand::remove_host_acknowledgement("host1", 1, Some(10));
        let svc = ExternalCommand::remove_service_acknowledgement("host1", "CPU", 5, Some(10));
        assert_eq!(host.command, "REMOVE_HOST_ACKNOWLEDGEMENT;host1");
        assert_eq!(svc.command, "REMOVE_SVC_ACKNOWLEDGEMENT;host1;CPU");
    }

    #[test]
    fn semicolons_pass_through_unescaped() {
        let options = AckOptions::default().with_comment("disk full; cleaning up");
        let cmd = ExternalCommand::acknowledge_host("db;01", 1, "ops", &options);
        assert_eq!(
            cmd.command,
            "ACKNOWLEDGE_HOST_PROBLEM;db;01;2;0;0;ops;disk full; cleaning up"
        );
    }

    #[test]
    fn missing_timestamp_resolves_to_now() {
        let before = chrono::Utc::now().timestamp();
        let cmd = ExternalCommand::remove_host_acknowledgement("host1", 1, None);
        let after = chrono::Utc::now().timestamp();
        assert!((before..=after).contains(&cmd.timestamp));
    }

    #[test]
    fn command_kind_round_trips_through_its_wire_name() {
        assert_eq!(CommandKind::AcknowledgeSvcProblem.to_string(), "ACKNOWLEDGE_SVC_PROBLEM");
        assert_eq!(
            CommandKind::from_str("REMOVE_HOST_ACKNOWLEDGEMENT").ok(),
            Some(CommandKind::RemoveHostAcknowledgement)
        );
        assert!(CommandKind::from_str("SCHEDULE_FORCED_SVC_CHECK").is_err());
    }

    #[test]
    fn batch_serializes_to_wire_shape() {
        let commands = [ExternalCommand::remove_service_acknowledgement("host1", "CPU", 5, Some(42))];
        let body = serde_json::to_value(CommandBatch { commands: &commands }).ok();
        assert_eq!(
            body,
            Some(json!({
                "commands": [{
                    "poller_id": 5,
                    "timestamp": 42,
                    "command": "REMOVE_SVC_ACKNOWLEDGEMENT;host1;CPU"
                }]
            }))
        );
    }
}
