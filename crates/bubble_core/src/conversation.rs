//! A visible list of bubbles, one state machine per message.
//!
//! The list decides which bubble is last and disposes bubbles that leave it;
//! each bubble keeps its own timer.

use std::collections::{HashMap, HashSet};

use bubble_logging::bubble_debug;

use crate::{update, BubbleProps, BubbleState, BubbleViewModel, ChatMessage, Effect, EpisodeId, JobStatus, Millis, Msg};

pub type MessageId = String;

/// One message as the host lists it, before `is_last` is known.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEntry {
    pub id: MessageId,
    pub status: Option<JobStatus>,
    pub content: String,
    pub message: ChatMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEffect {
    pub message_id: MessageId,
    pub effect: Effect,
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    order: Vec<MessageId>,
    bubbles: HashMap<MessageId, BubbleState>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn bubble(&self, id: &str) -> Option<&BubbleState> {
        self.bubbles.get(id)
    }

    /// Replaces the visible list. Duplicate ids after the first are skipped.
    pub fn sync(&mut self, entries: Vec<MessageEntry>, now: Millis) -> Vec<ConversationEffect> {
        let mut effects = Vec::new();
        let mut order: Vec<MessageId> = Vec::with_capacity(entries.len());
        for entry in &entries {
            if !order.contains(&entry.id) {
                order.push(entry.id.clone());
            }
        }

        let removed: Vec<MessageId> = self
            .order
            .iter()
            .filter(|id| !order.contains(id))
            .cloned()
            .collect();
        for id in removed {
            bubble_debug!("message {} left the conversation", id);
            effects.extend(self.dispatch_and_remove(&id));
        }

        let last_id = order.last().cloned();
        let mut synced: HashSet<MessageId> = HashSet::with_capacity(order.len());
        for entry in entries {
            if !synced.insert(entry.id.clone()) {
                bubble_debug!("skipping duplicate message id {}", entry.id);
                continue;
            }
            let is_last = last_id.as_deref() == Some(entry.id.as_str());
            let props = BubbleProps {
                status: entry.status,
                content: entry.content,
                message: entry.message,
                is_last,
            };
            effects.extend(self.dispatch(&entry.id, Msg::PropsChanged { props, now }));
        }

        self.order = order;
        effects
    }

    pub fn tick(&mut self, id: &str, episode: EpisodeId, now: Millis) -> Vec<ConversationEffect> {
        if !self.bubbles.contains_key(id) {
            return Vec::new();
        }
        self.dispatch(id, Msg::Tick { episode, now })
    }

    pub fn recover_clicked(&mut self, id: &str) -> Vec<ConversationEffect> {
        if !self.bubbles.contains_key(id) {
            return Vec::new();
        }
        self.dispatch(id, Msg::RecoverClicked)
    }

    /// Disposes every bubble, releasing all live tickers.
    pub fn dispose_all(&mut self) -> Vec<ConversationEffect> {
        let ids = std::mem::take(&mut self.order);
        ids.iter().flat_map(|id| self.dispatch_and_remove(id)).collect()
    }

    /// View models in visible order.
    pub fn views(&self) -> Vec<(MessageId, BubbleViewModel)> {
        self.order
            .iter()
            .filter_map(|id| self.bubbles.get(id).map(|b| (id.clone(), b.view())))
            .collect()
    }

    /// Clears every bubble's dirty flag; true if any was set.
    pub fn consume_dirty(&mut self) -> bool {
        self.bubbles
            .values_mut()
            .fold(false, |any, bubble| bubble.consume_dirty() || any)
    }

    fn dispatch(&mut self, id: &str, msg: Msg) -> Vec<ConversationEffect> {
        let state = self.bubbles.remove(id).unwrap_or_default();
        let (state, effects) = update(state, msg);
        self.bubbles.insert(id.to_string(), state);
        tag(id, effects)
    }

    fn dispatch_and_remove(&mut self, id: &str) -> Vec<ConversationEffect> {
        match self.bubbles.remove(id) {
            Some(state) => {
                let (_, effects) = update(state, Msg::Disposed);
                tag(id, effects)
            }
            None => Vec::new(),
        }
    }
}

fn tag(id: &str, effects: Vec<Effect>) -> Vec<ConversationEffect> {
    effects
        .into_iter()
        .map(|effect| ConversationEffect {
            message_id: id.to_string(),
            effect,
        })
        .collect()
}
