//! Lumen error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LumenError {
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("pixel buffer length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("surface size mismatch: {0}x{1} vs {2}x{3}")]
    SizeMismatch(u32, u32, u32, u32),

    #[error("nothing to render for {0:?}")]
    EmptyRender(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LumenError>;
