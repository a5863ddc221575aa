//! Inbound frame decoding and per-type logging.

use tracing::{error, info, warn};

use super::messages::ServerMessage;

/// Result of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// The frame parsed as JSON.
    Message(ServerMessage),
    /// The frame was not valid JSON; holds the parse error text.
    Malformed(String),
}

/// Decodes a text frame. Never fails: parse errors become
/// [`InboundFrame::Malformed`] so the connection stays open.
#[must_use]
pub fn decode_text(text: &str) -> InboundFrame {
    match ServerMessage::parse(text) {
        Ok(msg) => InboundFrame::Message(msg),
        Err(err) => InboundFrame::Malformed(err.to_string()),
    }
}

/// Decodes a binary frame as UTF-8 text.
#[must_use]
pub fn decode_binary(bytes: &[u8]) -> InboundFrame {
    match std::str::from_utf8(bytes) {
        Ok(text) => decode_text(text),
        Err(err) => InboundFrame::Malformed(format!("binary frame is not UTF-8: {err}")),
    }
}

/// Logs a decoded frame according to its type tag.
pub fn log_frame(frame: &InboundFrame) {
    match frame {
        InboundFrame::Message(ServerMessage::Connected) => {
            info!("connection confirmed");
        }
        InboundFrame::Message(ServerMessage::SdkMessage(data)) => {
            let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            info!("sdk response:\n{pretty}");
        }
        InboundFrame::Message(ServerMessage::Error(reason)) => {
            error!(error = reason.as_deref().unwrap_or("<none>"), "server error");
        }
        InboundFrame::Message(msg @ ServerMessage::Unknown(_)) => {
            let tag = msg.type_tag().unwrap_or("<none>");
            info!(message_type = tag, "unknown message type");
        }
        InboundFrame::Malformed(err) => {
            warn!(error = %err, "failed to parse message");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn malformed_text_is_reported_not_raised() {
        let frame = decode_text("not json");
        assert!(matches!(frame, InboundFrame::Malformed(_)));
        log_frame(&frame);
    }

    #[test]
    fn sdk_message_data_survives_decoding() {
        let frame = decode_text(r#"{"type":"sdk_message","data":{"foo":1}}"#);
        assert_eq!(
            frame,
            InboundFrame::Message(ServerMessage::SdkMessage(json!({"foo": 1})))
        );
    }

    #[test]
    fn unknown_frames_log_with_or_without_tag() {
        for text in [r#"{"type":"heartbeat"}"#, r#"{"data":1}"#] {
            let frame = decode_text(text);
            assert!(matches!(frame, InboundFrame::Message(ServerMessage::Unknown(_))));
            log_frame(&frame);
        }
    }

    #[test]
    fn binary_frames_decode_as_text() {
        let frame = decode_binary(br#"{"type":"connected"}"#);
        assert_eq!(frame, InboundFrame::Message(ServerMessage::Connected));
    }

    #[test]
    fn non_utf8_binary_is_malformed() {
        let frame = decode_binary(&[0xff, 0xfe, 0x00]);
        assert!(matches!(frame, InboundFrame::Malformed(_)));
    }
}
