//! Bubble core: pure message-status state machine and view-model helpers.
mod artifact;
mod conversation;
mod effect;
mod msg;
mod state;
mod status;
mod timer;
mod update;
mod view_model;

pub use artifact::{assign_keys, ArtifactKey, AttachedArtifact, ChatMessage};
pub use conversation::{Conversation, ConversationEffect, MessageEntry, MessageId};
pub use effect::Effect;
pub use msg::{BubbleProps, Msg};
pub use state::BubbleState;
pub use status::{classify, DisplayMode, JobStatus};
pub use timer::{format_elapsed, EpisodeId, Millis, TimerState, TICK_INTERVAL_MS};
pub use update::update;
pub use view_model::{
    AttachmentView, BubbleViewModel, DoneRegion, RecoveryRegion, RunningRegion, RECOVER_LABEL_ID,
};
