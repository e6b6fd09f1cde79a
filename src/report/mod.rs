//! Terminal rendering of advice and size trees

mod terminal;
mod tree;

pub use terminal::AdviceReporter;
pub use tree::{DominanceTreeWriter, SizeScale};
