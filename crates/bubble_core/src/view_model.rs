use crate::{ArtifactKey, AttachedArtifact, DisplayMode};

/// Message id the host localizes for the recovery control.
pub const RECOVER_LABEL_ID: &str = "home.recover";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BubbleViewModel {
    pub mode: DisplayMode,
    pub running: Option<RunningRegion>,
    pub done: Option<DoneRegion>,
    pub recovery: Option<RecoveryRegion>,
    pub dirty: bool,
}

impl BubbleViewModel {
    /// True when no region would draw anything.
    pub fn is_blank(&self) -> bool {
        self.running.is_none() && self.recovery.is_none() && self.done.as_ref().map_or(true, DoneRegion::is_empty)
    }
}

/// Spinner plus elapsed-time label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningRegion {
    pub elapsed_label: String,
}

/// Final answer: markdown text and delegated attachments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DoneRegion {
    pub markdown: Option<String>,
    pub attachments: Vec<AttachmentView>,
}

impl DoneRegion {
    pub fn is_empty(&self) -> bool {
        self.markdown.is_none() && self.attachments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentView {
    pub key: ArtifactKey,
    pub artifact: AttachedArtifact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryRegion {
    pub label_id: &'static str,
}

impl Default for RecoveryRegion {
    fn default() -> Self {
        Self {
            label_id: RECOVER_LABEL_ID,
        }
    }
}
