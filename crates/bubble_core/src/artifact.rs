use std::collections::HashSet;
use std::fmt;

use bubble_logging::{bubble_debug, bubble_warn};
use serde_json::Value;

const PRIMARY_ID_FIELD: &str = "id";
const SECONDARY_ID_FIELD: &str = "jobId";
const ATTACHED_FIELD: &str = "attached_messages";

/// Opaque record attached to a finished message (graph snapshots and the like).
///
/// The bubble never looks inside beyond the identity fields; rendering is
/// handed to whatever visualizer the host supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedArtifact {
    record: Value,
}

impl AttachedArtifact {
    pub fn new(record: Value) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &Value {
        &self.record
    }

    pub fn primary_id(&self) -> Option<String> {
        identity_field(&self.record, PRIMARY_ID_FIELD)
    }

    pub fn secondary_id(&self) -> Option<String> {
        identity_field(&self.record, SECONDARY_ID_FIELD)
    }
}

fn identity_field(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Host-owned message data the bubble reads on each render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatMessage {
    pub attached: Vec<AttachedArtifact>,
}

impl ChatMessage {
    /// Builds a message from the host's JSON record.
    ///
    /// A missing or non-array `attached_messages` field yields no attachments.
    pub fn from_value(value: &Value) -> Self {
        let attached = match value.get(ATTACHED_FIELD) {
            Some(Value::Array(items)) => items.iter().cloned().map(AttachedArtifact::new).collect(),
            Some(other) => {
                bubble_debug!("ignoring non-array {} ({})", ATTACHED_FIELD, kind_of(other));
                Vec::new()
            }
            None => Vec::new(),
        };
        Self { attached }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stable list key for one attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives one key per artifact, in order.
///
/// Primary id, then secondary id, then `#<index>`. A key already taken by an
/// earlier artifact gets an `@<index>` suffix so keys stay unique.
pub fn assign_keys(artifacts: &[AttachedArtifact]) -> Vec<ArtifactKey> {
    let mut seen = HashSet::with_capacity(artifacts.len());
    artifacts
        .iter()
        .enumerate()
        .map(|(index, artifact)| {
            let base = artifact
                .primary_id()
                .or_else(|| artifact.secondary_id())
                .unwrap_or_else(|| format!("#{index}"));
            let key = if seen.contains(&base) {
                bubble_warn!("duplicate attachment key {} at position {}", base, index);
                format!("{base}@{index}")
            } else {
                base
            };
            seen.insert(key.clone());
            ArtifactKey(key)
        })
        .collect()
}
