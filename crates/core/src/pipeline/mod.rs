mod face;
mod text;

pub use face::{ImageError, ImagePipeline, ImageReport};
pub use text::{rank_top, TextError, TextPipeline, TextReport};

/// Presented text rankings are truncated to the top entries.
pub const MAX_RANKED_LABELS: usize = 3;
