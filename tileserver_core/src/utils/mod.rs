mod compression;
mod format_detection;

pub use compression::*;
pub use format_detection::*;
