//! The scripted demo client.
//!
//! [`DemoClient`] owns one configuration and one [`SessionId`]. A run
//! connects, hands the socket to [`run_connection`], and returns the
//! resulting [`SessionReport`].

use tokio_tungstenite::connect_async;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ClientConfig;
use crate::domain::{SessionId, SessionReport};
use crate::error::ClientError;
use crate::ws::connection::{SessionScript, run_connection};
use crate::ws::messages::ClientMessage;

/// One client run against one agent server.
#[derive(Debug, Clone)]
pub struct DemoClient {
    config: ClientConfig,
    session_id: SessionId,
}

impl DemoClient {
    /// Creates a client with a fresh session id.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session_id: SessionId::new(),
        }
    }

    /// Returns the session id shared by every message of this run.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds a user message envelope for this run's session.
    #[must_use]
    pub fn user_message(&self, content: &str) -> ClientMessage {
        ClientMessage::user(self.session_id, content)
    }

    /// Builds the send schedule from the configuration.
    #[must_use]
    pub fn script(&self) -> SessionScript {
        SessionScript {
            first: self.user_message(&self.config.first_prompt),
            follow_up: self.user_message(&self.config.follow_up_prompt),
            follow_up_delay: self.config.follow_up_delay,
            session_duration: self.config.session_duration,
            close_timeout: self.config.close_timeout,
        }
    }

    /// Connects to the configured server and runs the scripted session.
    ///
    /// `shutdown` requests an early graceful close when cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] if the server is unreachable or
    /// rejects the handshake, and [`ClientError::Encode`] if an envelope
    /// fails to serialize.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<SessionReport, ClientError> {
        let url = self.config.url.as_str();
        let (socket, _response) = connect_async(url)
            .await
            .map_err(|source| ClientError::Connect {
                url: url.to_string(),
                source,
            })?;

        info!(url = %url, session_id = %self.session_id, "connected to agent server");

        let report = run_connection(socket, self.script(), shutdown).await?;

        info!(
            session_id = %report.session_id,
            reason = ?report.close_reason,
            sent = report.sent.len(),
            received = report.inbound.len(),
            "disconnected from server"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn script_shares_one_session_id() {
        let client = DemoClient::new(ClientConfig::default());
        let script = client.script();
        assert_eq!(script.first.session_id(), client.session_id());
        assert_eq!(script.follow_up.session_id(), client.session_id());
        assert_eq!(
            script.first.content(),
            "Hello! Can you tell me a short joke about programming?"
        );
        assert_eq!(script.follow_up.content(), "Now tell me one about TypeScript.");
    }

    #[test]
    fn script_uses_configured_timers() {
        let config = ClientConfig {
            follow_up_delay: Duration::from_millis(10),
            session_duration: Duration::from_millis(20),
            ..ClientConfig::default()
        };
        let script = DemoClient::new(config).script();
        assert_eq!(script.follow_up_delay, Duration::from_millis(10));
        assert_eq!(script.session_duration, Duration::from_millis(20));
        assert_eq!(script.close_timeout, Duration::from_secs(5));
    }

    #[test]
    fn each_client_gets_its_own_session() {
        let a = DemoClient::new(ClientConfig::default());
        let b = DemoClient::new(ClientConfig::default());
        assert_ne!(a.session_id(), b.session_id());
    }
}
