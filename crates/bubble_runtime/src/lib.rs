//! Bubble runtime: clocks, tickers and the controller that runs core effects.
mod clock;
mod controller;
mod lifecycle;
mod render;
mod settings;
mod ticker;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use controller::{BubbleController, RecoverCallback};
pub use lifecycle::{EpisodeHooks, TickerLifecycle};
pub use render::{ArtifactVisualizer, JsonSummaryVisualizer, MarkdownRenderer, PassthroughMarkdown, TextRenderer};
pub use settings::BubbleSettings;
pub use ticker::{ManualTickScheduler, ThreadTickScheduler, TickCallback, TickError, TickHandle, TickScheduler};
