//! Single-connection event loop.
//!
//! Owns both halves of the socket for the whole session and multiplexes
//! inbound frames, the follow-up timer, the session timer, the interrupt
//! token and the close handshake timeout in one `select!` loop. Timers
//! live inside the loop, so nothing fires once the session is closing.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::{Instant, sleep_until};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dispatch::{self, InboundFrame};
use super::messages::ClientMessage;
use crate::domain::{CloseReason, SentPrompt, SessionReport};
use crate::error::ClientError;

/// Roughly 30 years; used when a deadline would overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// What to send and when, relative to connection open.
#[derive(Debug, Clone)]
pub struct SessionScript {
    /// Sent as soon as the loop starts.
    pub first: ClientMessage,
    /// Sent once `follow_up_delay` has elapsed, unless closing.
    pub follow_up: ClientMessage,
    /// Offset of the follow-up send.
    pub follow_up_delay: Duration,
    /// Offset of the client-initiated close.
    pub session_duration: Duration,
    /// Maximum wait for the peer to finish the close handshake.
    pub close_timeout: Duration,
}

/// Runs the session on an already-open socket until it is closed.
///
/// Returns once the close handshake completes, the stream ends, the
/// transport fails, or the close timeout expires.
///
/// # Errors
///
/// Returns [`ClientError::Encode`] if an outbound envelope cannot be
/// serialized. Transport problems are recorded in the report instead.
pub async fn run_connection<S>(
    socket: WebSocketStream<S>,
    script: SessionScript,
    shutdown: CancellationToken,
) -> Result<SessionReport, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let opened = Instant::now();
    let mut report = SessionReport::new(script.first.session_id());
    let (mut ws_tx, mut ws_rx) = socket.split();

    let follow_up = sleep_until(deadline(opened, script.follow_up_delay));
    let session_end = sleep_until(deadline(opened, script.session_duration));
    let close_deadline = sleep_until(deadline(
        deadline(opened, script.session_duration),
        script.close_timeout,
    ));
    tokio::pin!(follow_up, session_end, close_deadline);

    let mut follow_up_pending = true;
    let mut closing = false;

    info!(content = script.first.content(), "sending");
    if let Err(err) = ws_tx.send(encode(&script.first)?).await {
        warn!(error = %err, "failed to send message");
        report.close_with(CloseReason::TransportError(err.to_string()));
        report.finish();
        return Ok(report);
    }
    report.sent.push(SentPrompt {
        content: script.first.content().to_string(),
        sent_after: opened.elapsed(),
    });

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    record(&mut report, dispatch::decode_text(text.as_str()));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    record(&mut report, dispatch::decode_binary(&bytes));
                }
                Some(Ok(Message::Close(close_frame))) => {
                    debug!(frame = ?close_frame, "close frame received");
                    if !closing {
                        info!("server closed the connection");
                        report.close_with(CloseReason::PeerClosed);
                        closing = true;
                        let at = deadline(Instant::now(), script.close_timeout);
                        close_deadline.as_mut().reset(at);
                    }
                    report.close_acknowledged = true;
                }
                Some(Ok(_)) => {}
                Some(Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed))
                | None => break,
                Some(Err(err)) => {
                    warn!(error = %err, "websocket error");
                    report.close_with(CloseReason::TransportError(err.to_string()));
                    break;
                }
            },

            () = &mut follow_up, if follow_up_pending && !closing => {
                follow_up_pending = false;
                info!(content = script.follow_up.content(), "sending");
                if let Err(err) = ws_tx.send(encode(&script.follow_up)?).await {
                    warn!(error = %err, "failed to send message");
                    report.close_with(CloseReason::TransportError(err.to_string()));
                    break;
                }
                report.sent.push(SentPrompt {
                    content: script.follow_up.content().to_string(),
                    sent_after: opened.elapsed(),
                });
            }

            () = &mut session_end, if !closing => {
                info!("closing connection");
                report.close_with(CloseReason::SessionElapsed);
                closing = true;
                close_deadline.as_mut().reset(deadline(Instant::now(), script.close_timeout));
                if let Err(err) = ws_tx.send(Message::Close(None)).await {
                    warn!(error = %err, "failed to send close frame");
                    break;
                }
            }

            () = shutdown.cancelled(), if !closing => {
                info!("interrupted, closing connection");
                report.close_with(CloseReason::Interrupted);
                closing = true;
                close_deadline.as_mut().reset(deadline(Instant::now(), script.close_timeout));
                if let Err(err) = ws_tx.send(Message::Close(None)).await {
                    warn!(error = %err, "failed to send close frame");
                    break;
                }
            }

            () = &mut close_deadline, if closing => {
                warn!(timeout = ?script.close_timeout, "close handshake timed out");
                break;
            }
        }
    }

    // Only applies when the stream ended without a Close frame.
    report.close_with(CloseReason::PeerClosed);
    report.finish();
    Ok(report)
}

/// `start + after`, saturating to a far-future instant instead of
/// overflowing.
fn deadline(start: Instant, after: Duration) -> Instant {
    start
        .checked_add(after)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

fn encode(msg: &ClientMessage) -> Result<Message, ClientError> {
    Ok(Message::text(serde_json::to_string(msg)?))
}

fn record(report: &mut SessionReport, frame: InboundFrame) {
    dispatch::log_frame(&frame);
    report.inbound.push(frame);
}
