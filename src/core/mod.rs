mod engine;
mod blocks;
mod generator;
mod formatter;
mod buffer;

pub use blocks::{extract_indentation, LineClassifier};
pub use generator::DocGenerator;
pub use formatter::CommentFormatter;
pub use buffer::SourceBuffer;

// Export the main engine
pub use engine::Engine;
