use crate::EpisodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Acquire a recurring ticker for a new running episode.
    StartTicker { episode: EpisodeId },
    /// Release the ticker of an episode that ended.
    CancelTicker { episode: EpisodeId },
    /// Ask the host to resume the stopped session.
    RecoverSession,
}
