//! Length and spam checks over sanitized fields.
//!
//! The verdict keeps a reason for logs and metrics only. Callers always get
//! the same rejection regardless of which rule failed.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use crate::submission::extract::Field;
use crate::submission::sanitize::SanitizedSubmission;

/// Accepted title length, in characters.
pub const TITLE_LEN: RangeInclusive<usize> = 3..=Field::Title.max_len();

/// Accepted story length, in characters.
pub const STORY_LEN: RangeInclusive<usize> = 20..=Field::Story.max_len();

/// A named spam heuristic matched against `title + " " + story`.
pub struct SpamRule {
    pub name: &'static str,
    pub pattern: Regex,
}

/// Spam heuristics, checked in order. All are case-insensitive.
pub static SPAM_RULES: LazyLock<Vec<SpamRule>> = LazyLock::new(|| {
    [
        ("url", r"(?i)https?://\S+"),
        ("buy-now", r"(?i)buy\s+now"),
        ("click-here", r"(?i)click\s+here"),
        ("pharma", r"(?i)viagra|cialis|pills"),
        ("make-money", r"(?i)make\s+money"),
        ("money-amount", r"(?i)\$\d+,?\d*\s*(million|k)"),
    ]
    .into_iter()
    .map(|(name, pattern)| SpamRule {
        name,
        pattern: Regex::new(pattern).expect("spam rule regex"),
    })
    .collect()
});

/// Why a submission was turned away. Never sent to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TitleTooShort,
    TitleTooLong,
    StoryTooShort,
    StoryTooLong,
    Spam(&'static str),
}

impl RejectReason {
    /// Low-cardinality label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::TitleTooShort => "title_too_short",
            RejectReason::TitleTooLong => "title_too_long",
            RejectReason::StoryTooShort => "story_too_short",
            RejectReason::StoryTooLong => "story_too_long",
            RejectReason::Spam(_) => "spam",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Spam(rule) => write!(f, "spam pattern '{}'", rule),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// First spam rule matching `text`, if any.
pub fn find_spam(text: &str) -> Option<&'static str> {
    SPAM_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.name)
}

/// Run every rule; the first failure decides the reason.
pub fn validate(submission: &SanitizedSubmission) -> Verdict {
    let title_len = submission.title.char_len();
    if title_len < *TITLE_LEN.start() {
        return Verdict::Reject(RejectReason::TitleTooShort);
    }
    if title_len > *TITLE_LEN.end() {
        return Verdict::Reject(RejectReason::TitleTooLong);
    }

    let story_len = submission.story.char_len();
    if story_len < *STORY_LEN.start() {
        return Verdict::Reject(RejectReason::StoryTooShort);
    }
    if story_len > *STORY_LEN.end() {
        return Verdict::Reject(RejectReason::StoryTooLong);
    }

    let combined = format!("{} {}", submission.title, submission.story);
    match find_spam(&combined) {
        Some(rule) => Verdict::Reject(RejectReason::Spam(rule)),
        None => Verdict::Accept,
    }
}
