use crate::view_model::{AttachmentView, BubbleViewModel, DoneRegion, RecoveryRegion, RunningRegion};
use crate::{assign_keys, classify, format_elapsed, BubbleProps, DisplayMode, EpisodeId, JobStatus, Millis, TimerState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BubbleState {
    props: BubbleProps,
    timer: Option<TimerState>,
    last_episode: EpisodeId,
    disposed: bool,
    dirty: bool,
}

impl BubbleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn props(&self) -> &BubbleProps {
        &self.props
    }

    pub fn mode(&self) -> DisplayMode {
        classify(self.props.status)
    }

    pub fn timer(&self) -> Option<&TimerState> {
        self.timer.as_ref()
    }

    pub fn elapsed_ms(&self) -> Millis {
        self.timer.map_or(0, |t| t.elapsed_ms)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn shows_recovery(&self) -> bool {
        !self.disposed && self.props.is_last && self.props.status == Some(JobStatus::Stopped)
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> BubbleViewModel {
        if self.disposed {
            return BubbleViewModel {
                dirty: self.dirty,
                ..BubbleViewModel::default()
            };
        }

        let mode = self.mode();
        let running = (mode == DisplayMode::Running).then(|| RunningRegion {
            elapsed_label: format_elapsed(self.elapsed_ms()),
        });
        let done = (mode == DisplayMode::Done).then(|| self.done_region());
        let recovery = self.shows_recovery().then(RecoveryRegion::default);

        BubbleViewModel {
            mode,
            running,
            done,
            recovery,
            dirty: self.dirty,
        }
    }

    fn done_region(&self) -> DoneRegion {
        let markdown = (!self.props.content.is_empty()).then(|| self.props.content.clone());
        let attached = &self.props.message.attached;
        let attachments = assign_keys(attached)
            .into_iter()
            .zip(attached.iter().cloned())
            .map(|(key, artifact)| AttachmentView { key, artifact })
            .collect();
        DoneRegion { markdown, attachments }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn replace_props(&mut self, props: BubbleProps) -> BubbleProps {
        std::mem::replace(&mut self.props, props)
    }

    pub(crate) fn begin_episode(&mut self, now: Millis) -> EpisodeId {
        self.last_episode += 1;
        self.timer = Some(TimerState::start(self.last_episode, now));
        self.last_episode
    }

    pub(crate) fn end_episode(&mut self) -> Option<EpisodeId> {
        self.timer.take().map(|t| t.episode)
    }

    pub(crate) fn timer_mut(&mut self) -> Option<&mut TimerState> {
        self.timer.as_mut()
    }

    pub(crate) fn mark_disposed(&mut self) {
        self.disposed = true;
    }
}
