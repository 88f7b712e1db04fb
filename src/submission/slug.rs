//! Filesystem/URL-safe identifiers derived from a title.

use std::fmt;

/// Longest slug, in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Lowercase ASCII letters, digits and single inner dashes.
///
/// Two different titles may share a slug; uniqueness is the consumer's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Slug(String);

impl Slug {
    /// Derive the slug for `title`.
    ///
    /// Every run of characters outside `[a-z0-9]` (after lowercasing) becomes
    /// one dash; dashes never lead or trail.
    pub fn derive(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len().min(MAX_SLUG_LEN));
        let mut pending_dash = false;

        for ch in title.to_lowercase().chars() {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                slug.push(ch);
                pending_dash = false;
            } else {
                pending_dash = true;
            }
        }

        // ASCII only from here on, so byte truncation is char truncation.
        slug.truncate(MAX_SLUG_LEN);
        let trimmed_len = slug.trim_end_matches('-').len();
        slug.truncate(trimmed_len);

        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
