//! Field extraction from the caller's JSON body.
//!
//! The form may post `{title, story, location}` directly or go through a
//! form service that prefixes keys with an underscore or calls the story
//! `message`. Each logical field has an explicit alias list; the first alias
//! holding a non-empty string wins.

use serde_json::Value;

/// The three free-text fields the relay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Story,
    Location,
}

impl Field {
    /// Keys accepted for this field, in priority order.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Title => &["title", "_title"],
            Field::Story => &["story", "_story", "message"],
            Field::Location => &["location", "_location"],
        }
    }

    /// Maximum length in characters after sanitization.
    pub const fn max_len(self) -> usize {
        match self {
            Field::Title => 100,
            Field::Story => 2000,
            Field::Location => 100,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Story => "story",
            Field::Location => "location",
        }
    }
}

/// Untrusted field values as posted. Absent or non-string values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    pub title: String,
    pub story: String,
    pub location: String,
}

impl RawSubmission {
    /// Extract the known fields from an arbitrary JSON value.
    ///
    /// Anything other than an object yields an empty submission; unknown
    /// keys are ignored.
    pub fn from_json(body: &Value) -> Self {
        Self {
            title: extract_field(body, Field::Title),
            story: extract_field(body, Field::Story),
            location: extract_field(body, Field::Location),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Story => &self.story,
            Field::Location => &self.location,
        }
    }
}

fn extract_field(body: &Value, field: Field) -> String {
    let Some(object) = body.as_object() else {
        return String::new();
    };

    field
        .aliases()
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_keys() {
        let raw = RawSubmission::from_json(&json!({
            "title": "My Dog",
            "story": "A story",
            "location": "Leeds",
        }));
        assert_eq!(raw.title, "My Dog");
        assert_eq!(raw.story, "A story");
        assert_eq!(raw.location, "Leeds");
    }

    #[test]
    fn test_aliases_and_priority() {
        let raw = RawSubmission::from_json(&json!({
            "_title": "Underscore title",
            "message": "From the message key",
            "_location": "Bristol",
        }));
        assert_eq!(raw.title, "Underscore title");
        assert_eq!(raw.story, "From the message key");
        assert_eq!(raw.location, "Bristol");

        let raw = RawSubmission::from_json(&json!({
            "story": "primary",
            "message": "secondary",
        }));
        assert_eq!(raw.story, "primary");
    }

    #[test]
    fn test_empty_alias_falls_through() {
        let raw = RawSubmission::from_json(&json!({
            "story": "",
            "message": "fallback",
        }));
        assert_eq!(raw.story, "fallback");
    }

    #[test]
    fn test_non_string_values_are_empty() {
        let raw = RawSubmission::from_json(&json!({
            "title": 12345,
            "story": {"nested": true},
            "location": null,
        }));
        assert_eq!(raw, RawSubmission::default());
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(RawSubmission::from_json(&json!(["title"])), RawSubmission::default());
        assert_eq!(RawSubmission::from_json(&json!("title")), RawSubmission::default());
        assert_eq!(RawSubmission::from_json(&Value::Null), RawSubmission::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = RawSubmission::from_json(&json!({
            "title": "Kept",
            "email": "someone@example.com",
            "__proto__": {"polluted": true},
        }));
        assert_eq!(raw.title, "Kept");
        assert_eq!(raw.get(Field::Story), "");
    }
}
