//! Untrusted text sanitization.
//!
//! Strips rather than escapes: the text ends up in a chat message for an
//! automation agent, where escaped markup would show up as noise.
//!
//! # Order
//! 1. Script blocks (tag and body)
//! 2. Remaining tag-like tokens
//! 3. Dangerous characters
//! 4. Trim, truncate to the field cap, trim again
//!
//! Block rules run while the angle brackets are still present. Tags are gone
//! before truncation, so the cap never splits one.

use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;

use crate::submission::extract::{Field, RawSubmission};

/// Characters removed from every field.
pub const DANGEROUS_CHARS: &[char] = &[
    '<', '>', '"', '\'', '`', ';', '|', '&', '$', '{', '}', '[', ']', '\\',
];

/// One removal step: every match of `pattern` is deleted.
pub struct SanitizeRule {
    pub name: &'static str,
    pub pattern: Regex,
}

/// Removal steps, applied in order.
pub static SANITIZE_RULES: LazyLock<Vec<SanitizeRule>> = LazyLock::new(|| {
    [
        ("script-block", r"(?is)<script\b[^>]*>.*?</script\s*>"),
        ("markup-tag", r"<[^>]+>"),
        ("dangerous-char", r#"[<>"'`;|&${}\[\]\\]"#),
    ]
    .into_iter()
    .map(|(name, pattern)| SanitizeRule {
        name,
        pattern: Regex::new(pattern).expect("sanitize rule regex"),
    })
    .collect()
});

/// Text that has been through [`sanitize`]. Only this module constructs it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizedField(String);

impl SanitizedField {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, which is what the length rules count.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl Deref for SanitizedField {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sanitize one raw value and cap it at `max_len` characters.
pub fn sanitize(input: &str, max_len: usize) -> SanitizedField {
    let mut cleaned = input.to_string();
    for rule in SANITIZE_RULES.iter() {
        if rule.pattern.is_match(&cleaned) {
            tracing::trace!(rule = rule.name, "Sanitize rule fired");
            cleaned = rule.pattern.replace_all(&cleaned, "").into_owned();
        }
    }

    let trimmed = cleaned.trim();
    let capped = match trimmed.char_indices().nth(max_len) {
        Some((cut, _)) => trimmed[..cut].trim_end(),
        None => trimmed,
    };

    SanitizedField(capped.to_string())
}

/// All three fields after sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizedSubmission {
    pub title: SanitizedField,
    pub story: SanitizedField,
    pub location: SanitizedField,
}

impl SanitizedSubmission {
    pub fn from_raw(raw: &RawSubmission) -> Self {
        let field = |f: Field| sanitize(raw.get(f), f.max_len());
        Self {
            title: field(Field::Title),
            story: field(Field::Story),
            location: field(Field::Location),
        }
    }
}
