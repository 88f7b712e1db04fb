//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handler)
//!     → request.rs (request ID, method gate, bounded JSON read)
//!     → [submission pipeline, relay]
//!     → response.rs (outcome → status, headers, JSON body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{relay_response, SubmissionError};
pub use server::{AppState, HttpServer};
