//! Outbound message construction.
//!
//! The rendered text tells the downstream agent where to save its draft.
//! Downstream automation parses `comic-draft-{slug}.md` out of this text, so
//! the template must not drift.

use serde::Serialize;

use crate::config::DownstreamConfig;
use crate::config::schema::RESPONSE_WAIT_BUDGET_SECS;
use crate::submission::AcceptedSubmission;

pub const MESSAGE_NAME: &str = "TR-Submission";
pub const MESSAGE_CHANNEL: &str = "telegram";
pub const WAKE_MODE: &str = "now";

/// Shown in place of an empty location.
const NO_LOCATION: &str = "Not specified";

/// JSON body sent to the downstream hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub message: String,
    pub name: &'static str,
    pub channel: &'static str,
    pub to: String,
    pub deliver: bool,
    pub wake_mode: &'static str,
    pub timeout_seconds: u64,
}

impl OutboundMessage {
    /// Build the message for an accepted submission.
    pub fn build(submission: &AcceptedSubmission, recipient: &str) -> Self {
        Self {
            message: render_text(submission),
            name: MESSAGE_NAME,
            channel: MESSAGE_CHANNEL,
            to: recipient.to_string(),
            deliver: true,
            wake_mode: WAKE_MODE,
            timeout_seconds: RESPONSE_WAIT_BUDGET_SECS,
        }
    }

    /// Build using the configured recipient.
    pub fn for_downstream(submission: &AcceptedSubmission, config: &DownstreamConfig) -> Self {
        Self::build(submission, &config.recipient)
    }
}

fn render_text(submission: &AcceptedSubmission) -> String {
    let fields = &submission.fields;
    let location = if fields.location.is_empty() {
        NO_LOCATION
    } else {
        fields.location.as_str()
    };
    let slug = &submission.slug;

    format!(
        "📝 New TR Story Submission\n\
         \n\
         **Title:** {title}\n\
         **Location:** {location}\n\
         **Slug:** {slug}\n\
         \n\
         **Story:**\n\
         {story}\n\
         \n\
         ---\n\
         Please generate a comic script for this story and save it to tr-website/scripts/comic-draft-{slug}.md\n\
         Include a suggested panel sequence (4 panels) with DALL-E prompts for each.\n\
         Mark the script as [DRAFT - PENDING REVIEW] in the header.",
        title = fields.title,
        story = fields.story,
    )
}
