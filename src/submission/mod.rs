//! Untrusted submission handling.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → extract.rs  (alias table → RawSubmission)
//!     → sanitize.rs (script blocks, tags, dangerous chars, caps)
//!     → validate.rs (length rules, spam rules → Verdict)
//!     → slug.rs     (title → Slug)
//!     → AcceptedSubmission, handed to the relay
//! ```
//!
//! Everything here is pure. Nothing is shared between requests.

pub mod extract;
pub mod sanitize;
pub mod slug;
pub mod validate;

pub use extract::{Field, RawSubmission};
pub use sanitize::{sanitize, SanitizedField, SanitizedSubmission};
pub use slug::Slug;
pub use validate::{validate, RejectReason, Verdict};

/// Characters of the title kept in rejection logs.
const LOG_TITLE_PREFIX: usize = 50;

/// A submission that passed validation, with its slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedSubmission {
    pub fields: SanitizedSubmission,
    pub slug: Slug,
}

/// A submission that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectReason,
    /// Sanitized title prefix, safe to log.
    pub title_prefix: String,
}

/// Sanitize and validate a raw submission.
pub fn screen(raw: &RawSubmission) -> Result<AcceptedSubmission, Rejection> {
    let fields = SanitizedSubmission::from_raw(raw);

    match validate(&fields) {
        Verdict::Accept => {
            let slug = Slug::derive(&fields.title);
            Ok(AcceptedSubmission { fields, slug })
        }
        Verdict::Reject(reason) => Err(Rejection {
            reason,
            title_prefix: fields.title.chars().take(LOG_TITLE_PREFIX).collect(),
        }),
    }
}
