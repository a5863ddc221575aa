//! Record of what happened during one client run.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::SessionId;
use crate::ws::dispatch::InboundFrame;
use crate::ws::messages::ServerMessage;

/// Why the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The configured session duration elapsed and the client closed.
    SessionElapsed,
    /// The interrupt signal fired and the client closed.
    Interrupted,
    /// The server sent a Close frame or ended the stream first.
    PeerClosed,
    /// The socket failed while reading or writing.
    TransportError(String),
}

/// A user message that was actually written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPrompt {
    /// Message text.
    pub content: String,
    /// Time between connection open and the send.
    pub sent_after: Duration,
}

/// Summary of a finished session, returned by
/// [`DemoClient::run`](crate::client::DemoClient::run).
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Session id used in every outbound envelope.
    pub session_id: SessionId,
    /// Wall-clock time the connection opened.
    pub opened_at: DateTime<Utc>,
    /// Wall-clock time the session ended.
    pub closed_at: Option<DateTime<Utc>>,
    /// Prompts sent, in send order.
    pub sent: Vec<SentPrompt>,
    /// Decoded inbound frames, in arrival order.
    pub inbound: Vec<InboundFrame>,
    /// Why the session ended. `None` only while the session is running.
    pub close_reason: Option<CloseReason>,
    /// Whether the close handshake completed before the session ended.
    pub close_acknowledged: bool,
}

impl SessionReport {
    /// Starts a report for a connection that just opened.
    #[must_use]
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            opened_at: Utc::now(),
            closed_at: None,
            sent: Vec::new(),
            inbound: Vec::new(),
            close_reason: None,
            close_acknowledged: false,
        }
    }

    /// Records the close reason. The first reason wins.
    pub fn close_with(&mut self, reason: CloseReason) {
        if self.close_reason.is_none() {
            self.close_reason = Some(reason);
        }
    }

    /// Marks the session as finished.
    pub fn finish(&mut self) {
        self.closed_at = Some(Utc::now());
    }

    /// Returns the `data` payloads of all `sdk_message` frames.
    pub fn sdk_messages(&self) -> impl Iterator<Item = &serde_json::Value> {
        self.inbound.iter().filter_map(|frame| match frame {
            InboundFrame::Message(ServerMessage::SdkMessage(data)) => Some(data),
            _ => None,
        })
    }

    /// Returns the number of frames that failed to parse.
    #[must_use]
    pub fn malformed_count(&self) -> usize {
        self.inbound
            .iter()
            .filter(|frame| matches!(frame, InboundFrame::Malformed(_)))
            .count()
    }
}
