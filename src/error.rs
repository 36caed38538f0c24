use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error initializing tracking runtime: {0}")]
    Init(String),

    #[error("Tracking runtime backend not available: {0}")]
    BackendUnavailable(&'static str),

    #[error("Camera error in {operation}: code {code}")]
    Camera { operation: &'static str, code: i32 },

    #[error("No camera frame available")]
    NoFrameAvailable,

    #[error("Unsupported pixel format: {0} bytes per pixel")]
    UnsupportedPixelFormat(u32),

    #[error("Frame buffer too small: expected {expected}, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate metadata key: {0}")]
    DuplicateKey(String),

    #[error("Invalid metadata key: {0:?}")]
    InvalidKey(String),

    #[error("Giving up after {0} consecutive frame failures")]
    TooManyFailures(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
