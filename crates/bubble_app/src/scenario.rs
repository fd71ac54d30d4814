use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bubble_core::BubbleProps;
use bubble_logging::bubble_debug;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("step {index}: invalid message_json: {source}")]
    MessageJson {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("scenario has no steps")]
    Empty,
}

/// Scripted sequence of host renders for one bubble.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,
    /// How long to keep rendering after the last step.
    #[serde(default)]
    pub linger_ms: u64,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioStep {
    /// Delay since the previous step.
    #[serde(default)]
    pub after_ms: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Host message record as JSON text, e.g. `{"attached_messages": [...]}`.
    #[serde(default)]
    pub message_json: Option<String>,
    #[serde(default = "default_is_last")]
    pub is_last: bool,
    #[serde(default)]
    pub click_recover: bool,
}

fn default_is_last() -> bool {
    true
}

impl ScenarioStep {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.after_ms)
    }

    pub fn props(&self, index: usize) -> Result<BubbleProps, ScenarioError> {
        let message = match &self.message_json {
            Some(text) => serde_json::from_str::<Value>(text)
                .map_err(|source| ScenarioError::MessageJson { index, source })?,
            None => Value::Null,
        };
        Ok(BubbleProps::from_raw(
            self.status.as_deref(),
            self.content.clone(),
            &message,
            self.is_last,
        ))
    }
}

pub fn parse_scenario(text: &str, path: &Path) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = ron::from_str(text).map_err(|err| ScenarioError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    if scenario.steps.is_empty() {
        return Err(ScenarioError::Empty);
    }
    for (index, step) in scenario.steps.iter().enumerate() {
        step.props(index)?;
    }
    Ok(scenario)
}

pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let text = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let scenario = parse_scenario(&text, path)?;
    bubble_debug!("loaded {} steps from {:?}", scenario.steps.len(), path);
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use bubble_core::JobStatus;
    use tempfile::TempDir;

    use super::{load_scenario, parse_scenario, ScenarioError};

    const FINISHED: &str = r#"(
        tick_interval_ms: Some(500),
        steps: [
            (status: Some("RUNNING")),
            (
                after_ms: 2500,
                status: Some("FINISHED"),
                content: "**Hello**",
                message_json: Some("{\"attached_messages\": [{\"id\": \"a1\"}]}"),
            ),
        ],
    )"#;

    #[test]
    fn parses_defaults_and_props() {
        let scenario = parse_scenario(FINISHED, Path::new("inline.ron")).unwrap();
        assert_eq!(scenario.tick_interval_ms, Some(500));
        assert_eq!(scenario.linger_ms, 0);
        assert_eq!(scenario.steps.len(), 2);
        assert_eq!(scenario.steps[0].after_ms, 0);
        assert!(scenario.steps[0].is_last);

        let props = scenario.steps[1].props(1).unwrap();
        assert_eq!(props.status, Some(JobStatus::Finished));
        assert_eq!(props.content, "**Hello**");
        assert_eq!(props.message.attached.len(), 1);
    }

    #[test]
    fn rejects_bad_message_json() {
        let text = r#"(steps: [(status: Some("FINISHED"), message_json: Some("{oops"))])"#;
        let err = parse_scenario(text, Path::new("bad.ron")).unwrap_err();
        assert!(matches!(err, ScenarioError::MessageJson { index: 0, .. }));
    }

    #[test]
    fn rejects_empty_scenario() {
        let err = parse_scenario("(steps: [])", Path::new("empty.ron")).unwrap_err();
        assert!(matches!(err, ScenarioError::Empty));
    }

    #[test]
    fn loads_from_disk_and_reports_missing_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("finished.ron");
        fs::write(&path, FINISHED).unwrap();
        assert_eq!(load_scenario(&path).unwrap().steps.len(), 2);

        let missing = temp.path().join("missing.ron");
        assert!(matches!(load_scenario(&missing), Err(ScenarioError::Read { .. })));
    }
}
