pub mod camera;
pub mod error;
pub mod frame;
pub mod io;
pub mod metadata;
pub mod recorder;
pub mod types;
pub mod visualization;

pub use error::{Error, Result};
