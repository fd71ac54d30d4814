use bubble_core::{ArtifactKey, AttachedArtifact, BubbleViewModel};

const MAX_SUMMARY_CHARS: usize = 120;
const TRUNCATED_MARKER: &str = "…";

/// Turns markdown into display lines. Formatting semantics belong to the host.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Vec<String>;
}

/// Emits the markdown source unchanged, one line per source line.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughMarkdown;

impl MarkdownRenderer for PassthroughMarkdown {
    fn render(&self, markdown: &str) -> Vec<String> {
        markdown.lines().map(ToOwned::to_owned).collect()
    }
}

/// Draws one attached artifact given its list key.
pub trait ArtifactVisualizer: Send + Sync {
    fn visualize(&self, key: &ArtifactKey, artifact: &AttachedArtifact) -> Vec<String>;
}

/// One-line compact JSON summary per artifact.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSummaryVisualizer;

impl ArtifactVisualizer for JsonSummaryVisualizer {
    fn visualize(&self, key: &ArtifactKey, artifact: &AttachedArtifact) -> Vec<String> {
        let json = serde_json::to_string(artifact.record()).unwrap_or_default();
        vec![format!("[attachment {key}] {}", truncate(&json))]
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_SUMMARY_CHARS {
        return text.to_string();
    }
    let mut end = MAX_SUMMARY_CHARS;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{TRUNCATED_MARKER}", &text[..end])
}

/// Plain-text bubble renderer for terminals and logs.
pub struct TextRenderer {
    pub markdown: Box<dyn MarkdownRenderer>,
    pub visualizer: Box<dyn ArtifactVisualizer>,
    pub spinner: String,
    pub recover_label: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            markdown: Box::new(PassthroughMarkdown),
            visualizer: Box::new(JsonSummaryVisualizer),
            spinner: "[working]".to_string(),
            recover_label: "[recover session]".to_string(),
        }
    }
}

impl TextRenderer {
    pub fn render(&self, view: &BubbleViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(running) = &view.running {
            if running.elapsed_label.is_empty() {
                lines.push(self.spinner.clone());
            } else {
                lines.push(format!("{} {}", self.spinner, running.elapsed_label));
            }
        }

        if let Some(done) = &view.done {
            if let Some(markdown) = &done.markdown {
                lines.extend(self.markdown.render(markdown));
            }
            for attachment in &done.attachments {
                lines.extend(self.visualizer.visualize(&attachment.key, &attachment.artifact));
            }
        }

        if view.recovery.is_some() {
            lines.push(self.recover_label.clone());
        }

        lines
    }
}
