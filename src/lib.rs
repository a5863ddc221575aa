//! # agent-demo-client
//!
//! Scripted WebSocket demo client for an agent SDK server.
//!
//! The client opens one connection, sends a first prompt immediately and
//! a follow-up after a delay, logs every response by its `type` tag, and
//! closes the connection after a fixed session duration or on Ctrl+C.
//!
//! ## Architecture
//!
//! ```text
//! main (config, tracing, Ctrl+C)
//!     │
//!     ├── DemoClient (client)
//!     │       │
//!     │       └── run_connection (ws/)
//!     │               ├── ClientMessage / ServerMessage
//!     │               └── frame dispatch + logging
//!     │
//!     └── SessionReport (domain/)
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod shutdown;
pub mod ws;
