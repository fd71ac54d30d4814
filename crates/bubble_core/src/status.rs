use std::fmt;

/// Job status as reported by the backend for one chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Created,
    Running,
    Finished,
    Failed,
    Stopped,
}

impl JobStatus {
    /// Parses the wire literal. Anything unrecognised yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "CREATED" => Some(JobStatus::Created),
            "RUNNING" => Some(JobStatus::Running),
            "FINISHED" => Some(JobStatus::Finished),
            "FAILED" => Some(JobStatus::Failed),
            "STOPPED" => Some(JobStatus::Stopped),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "CREATED",
            JobStatus::Running => "RUNNING",
            JobStatus::Finished => "FINISHED",
            JobStatus::Failed => "FAILED",
            JobStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which region of the bubble is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    Running,
    Done,
    #[default]
    Neutral,
}

/// Maps a status to its display mode. Total: missing status is `Neutral`.
pub fn classify(status: Option<JobStatus>) -> DisplayMode {
    match status {
        Some(JobStatus::Created | JobStatus::Running) => DisplayMode::Running,
        Some(JobStatus::Finished | JobStatus::Failed) => DisplayMode::Done,
        Some(JobStatus::Stopped) | None => DisplayMode::Neutral,
    }
}
