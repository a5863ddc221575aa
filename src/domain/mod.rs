//! Domain layer: session identity and the per-run report.

pub mod report;
pub mod session_id;

pub use report::{CloseReason, SentPrompt, SessionReport};
pub use session_id::SessionId;
