//! Archive stream formats.

pub mod compression;
pub mod detect;

// Re-export main types for convenience
pub use compression::CompressionCodec;
