// Recorder implementations for Lifetrace.

pub mod dot_renderer;
pub mod graph_builder;
pub mod text_recorder;

pub use dot_renderer::NodeRenderer;
pub use graph_builder::{GraphBuilder, GraphOptions};
pub use text_recorder::TextRecorder;
