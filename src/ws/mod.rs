//! WebSocket layer: wire messages, frame dispatch, and the connection loop.
//!
//! The client keeps a single socket open for the whole session. All
//! traffic is JSON text frames using the `type`/`data` envelope.

pub mod connection;
pub mod dispatch;
pub mod messages;
