use serde_json::Value;

use crate::{ChatMessage, EpisodeId, JobStatus, Millis};

/// Everything the host passes in on each render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BubbleProps {
    pub status: Option<JobStatus>,
    pub content: String,
    pub message: ChatMessage,
    pub is_last: bool,
}

impl BubbleProps {
    /// Builds props from the host's raw wire values.
    pub fn from_raw(status: Option<&str>, content: impl Into<String>, message: &Value, is_last: bool) -> Self {
        Self {
            status: status.and_then(JobStatus::parse),
            content: content.into(),
            message: ChatMessage::from_value(message),
            is_last,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Host re-rendered the bubble with (possibly unchanged) props.
    PropsChanged { props: BubbleProps, now: Millis },
    /// Ticker for `episode` fired.
    Tick { episode: EpisodeId, now: Millis },
    /// User activated the recovery control.
    RecoverClicked,
    /// Bubble removed from display.
    Disposed,
    /// Fallback for placeholder wiring.
    NoOp,
}
