//! Downstream relay subsystem.
//!
//! # Data Flow
//! ```text
//! AcceptedSubmission
//!     → message.rs (render template → OutboundMessage)
//!     → client.rs  (one POST to the hook)
//!     → types.rs   (RelayOutcome: Delivered | DegradedDelivered | Errored)
//!     → http::response maps the outcome for the caller
//! ```

pub mod client;
pub mod message;
pub mod types;

pub use client::RelayClient;
pub use message::OutboundMessage;
pub use types::{RelayError, RelayOutcome};
